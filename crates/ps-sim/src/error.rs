//! Error types for simulation operations.

use ps_controls::ControlError;
use ps_core::CoreError;
use ps_model::ModelError;
use thiserror::Error;

/// Errors encountered while setting up or running a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Simulation bounds cannot be integrated.
    #[error("Integration error: {what}")]
    Integration { what: &'static str },

    #[error("Non-finite output at t = {t}")]
    NonFinite { t: f64 },

    #[error("Invalid simulation result: {what}")]
    InvalidResult { what: &'static str },

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Controller error: {0}")]
    Control(#[from] ControlError),

    #[error("Numeric error: {0}")]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
