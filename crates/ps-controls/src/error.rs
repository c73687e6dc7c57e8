//! Error types for controller configuration.

use ps_model::ModelError;
use thiserror::Error;

/// Result type for controller operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur while configuring a controller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a controller constructor.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Controller transfer function could not be built.
    #[error("Controller model error: {0}")]
    Model(#[from] ModelError),
}
