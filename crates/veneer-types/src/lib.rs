//! Veneer Type Model
//!
//! Type metadata, member descriptors and target configuration for the
//! veneer proxy generator.
//!
//! The generator never inspects a live compiler. Everything it knows about a
//! target type comes through the [`TypeOracle`] trait, which answers three
//! questions: does a name resolve, what members does a type declare, and
//! which types does it derive from.

#![warn(missing_docs)]

pub mod error;
pub mod member;
pub mod oracle;
pub mod target;
pub mod ty;

pub use error::TypeError;
pub use member::{
    Accessibility, EventMember, GenericParam, MemberDescriptor, MethodMember, Modifiers,
    OperatorKind, OperatorMember, Parameter, ParameterKind, PropertyMember,
};
pub use oracle::{MetadataOracle, TypeMetadata, TypeOracle};
pub use target::{ImplementationOptions, ProxyAccessibility, TargetSpec};
pub use ty::{TypeHandle, TypeKind, TypeName};
