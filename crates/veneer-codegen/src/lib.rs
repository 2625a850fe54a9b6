//! Veneer Code Generation
//!
//! Synthesizes capability descriptors, forwarding proxies and the proxy
//! registry for a set of target types.
//!
//! This crate provides:
//! - Member resolution against a [`veneer_types::TypeOracle`]
//! - Inheritance linking between targets
//! - Foreign → local type replacement
//! - Descriptor, proxy and registry emitters
//! - Diagnostics rendering
//!
//! # Usage
//!
//! ```ignore
//! use veneer_codegen::{Generator, GeneratorSettings, ReplacementRegistry};
//! use veneer_types::{MetadataOracle, TargetSpec};
//!
//! let oracle = MetadataOracle::from_file("types.json".as_ref())?;
//! let settings = GeneratorSettings::default();
//! let replacements = ReplacementRegistry::from_pairs([("Host.Color", "Local.RgbColor")]);
//!
//! let output = Generator::new(&oracle, &settings, &replacements)
//!     .generate(&[TargetSpec::new("Acme.Widget")]);
//! for file in &output.files {
//!     std::fs::write(&file.name, &file.contents)?;
//! }
//! ```

#![warn(rust_2018_idioms)]

pub mod diagnostic;
pub mod emit;
pub mod error;
pub mod generator;
pub mod linker;
pub mod replacement;
pub mod resolver;
pub mod settings;

pub use diagnostic::{Diagnostic, ErrorCode};
pub use emit::{AbstractionSynthesizer, EmitContext, Emitted, ProxySynthesizer, RegistryEmitter, RegistryTriple};
pub use error::{GenerateError, GenerateResult};
pub use generator::{GeneratedFile, GenerationOutput, Generator};
pub use linker::{InheritanceLinker, LinkForest, LinkNode, ProxyLink};
pub use replacement::{ReplacementEntry, ReplacementRegistry, Translated};
pub use resolver::{Ancestry, ComposedDescriptor, DescriptorSurface, MemberResolver, ResolvedSurface};
pub use settings::GeneratorSettings;
