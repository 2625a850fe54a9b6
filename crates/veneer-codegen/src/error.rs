//! Generation errors

use thiserror::Error;

pub type GenerateResult<T> = Result<T, GenerateError>;

/// Problems found while generating code for one target
///
/// Only [`GenerateError::Resolution`] and [`GenerateError::Configuration`]
/// stop a target; the others are warnings attached to otherwise complete
/// output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("Cannot resolve type '{name}' required by target '{target}'")]
    Resolution { target: String, name: String },

    #[error("Invalid configuration for target '{target}': {reason}")]
    Configuration { target: String, reason: String },

    #[error("No surrogate registered for '{ty}' used by '{member}' on '{target}'; forwarding untranslated")]
    TranslationGap {
        target: String,
        member: String,
        ty: String,
    },

    #[error("Operator '{symbol}' on '{target}' has no named equivalent; skipped")]
    UnknownOperator { target: String, symbol: String },
}

impl GenerateError {
    /// Whether this error prevents output for its target
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GenerateError::Resolution { .. } | GenerateError::Configuration { .. }
        )
    }

    /// Target the error belongs to
    pub fn target(&self) -> &str {
        match self {
            GenerateError::Resolution { target, .. }
            | GenerateError::Configuration { target, .. }
            | GenerateError::TranslationGap { target, .. }
            | GenerateError::UnknownOperator { target, .. } => target,
        }
    }

    pub(crate) fn configuration(target: &str, reason: impl Into<String>) -> Self {
        GenerateError::Configuration {
            target: target.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn resolution(target: &str, name: &str) -> Self {
        GenerateError::Resolution {
            target: target.to_string(),
            name: name.to_string(),
        }
    }
}
