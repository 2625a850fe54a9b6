//! Registry errors

use std::any::TypeId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No factory is registered for the abstraction
    #[error("No proxy factory registered for {abstraction:?}")]
    NoFactory { abstraction: TypeId },

    /// The process-wide map was initialized before
    #[error("The proxy map is already initialized")]
    AlreadyInitialized,

    /// A value of the wrong type was handed to, or returned by, a factory
    #[error("Type mismatch: expected {expected}")]
    TypeMismatch { expected: &'static str },
}
