//! Simulation runner and result recording.

use ps_core::linspace;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::closed_loop::ClosedLoopSystem;
use crate::error::{SimError, SimResult};
use crate::integrator::{ForwardEuler, Heun, Integrator, RK4};
use crate::model::TransientModel;
use crate::result::SimulationResult;

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta (default, most accurate, 4 rhs calls per step).
    #[default]
    Rk4,
    /// Heun / explicit trapezoidal (2nd-order, 2 rhs calls per step).
    Heun,
    /// Forward Euler (1st-order, 1 rhs call per step).
    ForwardEuler,
}

/// Options for simulation runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimOptions {
    /// Start of the horizon (seconds)
    pub t_start: f64,
    /// End of the horizon (seconds)
    pub t_end: f64,
    /// Number of uniformly spaced samples, both ends included
    pub step_count: usize,
    /// Integrator type (default: RK4)
    #[serde(default)]
    pub integrator: IntegratorType,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            t_start: 0.0,
            t_end: 5.0,
            step_count: 501,
            integrator: IntegratorType::default(),
        }
    }
}

impl SimOptions {
    pub fn new(t_start: f64, t_end: f64, step_count: usize) -> Self {
        Self {
            t_start,
            t_end,
            step_count,
            integrator: IntegratorType::default(),
        }
    }

    pub fn with_integrator(mut self, integrator: IntegratorType) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if !self.t_start.is_finite() || !self.t_end.is_finite() {
            return Err(SimError::Integration {
                what: "horizon bounds must be finite",
            });
        }
        if self.t_end <= self.t_start {
            return Err(SimError::Integration {
                what: "t_end must be greater than t_start",
            });
        }
        if self.step_count < 2 {
            return Err(SimError::Integration {
                what: "step_count must be at least 2",
            });
        }
        Ok(())
    }

    /// Fixed step size. Also the sampling interval of any digital controller.
    pub fn dt(&self) -> f64 {
        (self.t_end - self.t_start) / (self.step_count - 1) as f64
    }
}

/// Record of simulation results.
#[derive(Clone, Debug)]
pub struct SimRecord {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// Measured output at each time point
    pub y: Vec<f64>,
}

/// Run a transient simulation on the uniform grid described by `opts`.
///
/// The model is reset first. At every grid time the output is recorded,
/// then `sample` is called once and the step to the next grid time is
/// integrated with the selected fixed-step method.
pub fn run_sim<M: TransientModel>(model: &mut M, opts: &SimOptions) -> SimResult<SimRecord> {
    opts.validate()?;
    match opts.integrator {
        IntegratorType::Rk4 => integrate(model, opts, &RK4),
        IntegratorType::Heun => integrate(model, opts, &Heun),
        IntegratorType::ForwardEuler => integrate(model, opts, &ForwardEuler),
    }
}

fn integrate<M: TransientModel, I: Integrator>(
    model: &mut M,
    opts: &SimOptions,
    integrator: &I,
) -> SimResult<SimRecord> {
    let t = linspace(opts.t_start, opts.t_end, opts.step_count)?;
    let dt = opts.dt();

    model.reset();
    let mut x = model.initial_state();
    let mut y = Vec::with_capacity(t.len());

    for (k, &t_k) in t.iter().enumerate() {
        let y_k = model.output(t_k, &x);
        if !y_k.is_finite() {
            return Err(SimError::NonFinite { t: t_k });
        }
        y.push(y_k);

        if k + 1 == t.len() {
            break;
        }
        model.sample(t_k, &x)?;
        x = integrator.step(model, t_k, &x, dt)?;
    }

    Ok(SimRecord { t, y })
}

/// Step response of a closed (or open) loop over the horizon in `opts`.
pub fn simulate(system: &mut ClosedLoopSystem, opts: &SimOptions) -> SimResult<SimulationResult> {
    debug!(
        kind = ?system.kind(),
        states = system.state_dim(),
        t_start = opts.t_start,
        t_end = opts.t_end,
        step_count = opts.step_count,
        integrator = ?opts.integrator,
        "starting simulation"
    );
    let record = run_sim(system, opts)?;
    SimulationResult::new(record.t, record.y, system.setpoint())
}
