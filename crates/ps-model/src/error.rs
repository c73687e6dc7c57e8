//! Error types for plant model construction.

use ps_core::CoreError;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while building or realizing a plant model.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// Malformed transfer function or unrealizable model.
    #[error("Invalid model: {what}")]
    InvalidModel { what: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ModelError {
    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        ModelError::InvalidModel { what: what.into() }
    }
}
