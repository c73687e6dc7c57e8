//! Time-domain simulation of linear plants under feedback.
//!
//! Provides:
//! - `TransientModel` trait: `x' = f(t, x)` plus a measured output and a
//!   once-per-step sampling hook for digital controllers
//! - Fixed-step RK4, Heun and forward Euler integrators
//! - `ClosedLoopSystem`: plant + PID around unity feedback (or open loop)
//! - `simulate`: uniform-grid step response producing a `SimulationResult`

pub mod closed_loop;
pub mod error;
pub mod integrator;
pub mod model;
pub mod result;
pub mod sim;

pub use closed_loop::{ClosedLoopSystem, LoopKind, LoopMode};
pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Heun, Integrator, RK4};
pub use model::TransientModel;
pub use result::SimulationResult;
pub use sim::{IntegratorType, SimOptions, SimRecord, run_sim, simulate};
