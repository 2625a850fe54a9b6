//! Veneer Runtime
//!
//! Runtime counterpart of the generated registry: a concurrent map from
//! target types to their abstractions and proxy factories, an explicit
//! process-wide instance, and the null-safe adaptation contract.

pub mod adapter;
pub mod error;
pub mod global;
pub mod map;

pub use adapter::{adapt_null, TypeAdapter};
pub use error::RegistryError;
pub use map::{ProxyFactory, ProxyMap};
