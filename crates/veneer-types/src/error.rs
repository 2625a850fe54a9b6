//! Type metadata errors

use thiserror::Error;

/// Errors that can occur while loading type metadata
#[derive(Debug, Error)]
pub enum TypeError {
    /// Metadata file could not be read
    #[error("Failed to read type metadata: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata was not valid JSON or did not match the schema
    #[error("Failed to parse type metadata: {0}")]
    Parse(#[from] serde_json::Error),

    /// The same type was described twice
    #[error("Duplicate type in metadata: {name}")]
    DuplicateType {
        /// Fully-qualified name of the duplicated type
        name: String,
    },

    /// A type name was empty or malformed
    #[error("Invalid type name: '{name}'")]
    InvalidName {
        /// The offending name
        name: String,
    },
}
