//! Feedback controllers for pidsim.
//!
//! The controller is split the same way everywhere in the workspace:
//! - [`PidConfig`] is immutable configuration (gains, integration rule, limits)
//!   with a pure `update(&state, t, error) -> (state, control)`
//! - [`PIDControllerState`] is the run-scoped mutable part
//! - [`PIDController`] owns one of each and is what a simulation run steps
//!
//! A controller instance belongs to exactly one run. Runs that need the same
//! gains build their own instance from the shared [`PidGains`].

pub mod controller;
pub mod error;

pub use controller::{
    IntegralRule, OutputLimits, PIDController, PIDControllerState, PidConfig, PidGains,
};
pub use error::{ControlError, ControlResult};
