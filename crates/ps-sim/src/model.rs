//! TransientModel trait for pluggable dynamic systems.

use crate::error::SimResult;

/// Trait for transient (dynamic) system models.
///
/// A TransientModel must implement:
/// - State type (Clone, for snapshots)
/// - Initial state
/// - RHS (right-hand side) computation: x_dot = f(t, x)
/// - Measured output y(t, x)
/// - Scalar field arithmetic for integration: add states, scale by scalar
///
/// Models that carry run-scoped state (a digital controller, a held input)
/// override `reset` and `sample`.
pub trait TransientModel {
    /// State type (must be Clone).
    type State: Clone;

    /// Return the initial state at the start of the horizon.
    fn initial_state(&self) -> Self::State;

    /// Compute state derivative dxdt = f(t, x).
    ///
    /// Called several times per step by multi-stage integrators, so it must
    /// not advance any run-scoped state.
    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// Measured output at (t, x).
    fn output(&self, t: f64, x: &Self::State) -> f64;

    /// Called exactly once per step, at the grid time `t`, before the step
    /// `[t, t + dt]` is integrated. Anything computed here is held over the
    /// whole step.
    fn sample(&mut self, _t: f64, _x: &Self::State) -> SimResult<()> {
        Ok(())
    }

    /// Clear run-scoped state. Called at the start of every run.
    fn reset(&mut self) {}

    /// Add two states element-wise: result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Scale a state by a scalar: result = scale * a.
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;
}
