//! Plant + PID controller around unity feedback.

use nalgebra::DVector;
use ps_controls::{PIDController, PidConfig};
use ps_model::{StateSpaceModel, TransferFunction};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;

/// How a closed loop is composed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Ideal controller `C(s)` composed with the plant as `CG / (1 + CG)`
    /// and realized as one augmented model driven by the setpoint.
    #[default]
    Continuous,
    /// Stateful PID stepped once per integration step, output held over
    /// the step (zero-order hold).
    Sampled,
}

/// What a [`ClosedLoopSystem`] is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopKind {
    Open,
    Continuous,
    Sampled,
}

#[derive(Debug, Clone)]
enum Dynamics {
    Open {
        plant: StateSpaceModel,
        input: f64,
    },
    Continuous {
        model: StateSpaceModel,
    },
    Sampled {
        plant: StateSpaceModel,
        controller: PIDController,
        /// Control signal held over the current step.
        control: f64,
    },
}

/// Plant, controller, setpoint and unity feedback as one dynamical system.
///
/// The instance owns any controller state it needs, so one run must own one
/// system. The simulator calls [`TransientModel::reset`] before each run.
#[derive(Debug, Clone)]
pub struct ClosedLoopSystem {
    setpoint: f64,
    dynamics: Dynamics,
}

impl ClosedLoopSystem {
    /// Uncontrolled plant driven by a constant step of height `setpoint`
    /// (a unit step for a unit setpoint).
    pub fn open_loop(plant: &TransferFunction, setpoint: f64) -> SimResult<Self> {
        let setpoint = check_setpoint(setpoint)?;
        let plant = plant.to_state_space()?;
        Ok(Self {
            setpoint,
            dynamics: Dynamics::Open {
                plant,
                input: setpoint,
            },
        })
    }

    /// Continuous-time loop `C(s) G(s) / (1 + C(s) G(s))`.
    ///
    /// # Errors
    ///
    /// `Model` if the loop has no characteristic polynomial (`1 + CG = 0`
    /// identically) or cannot be realized.
    pub fn continuous(
        plant: &TransferFunction,
        config: &PidConfig,
        setpoint: f64,
    ) -> SimResult<Self> {
        let setpoint = check_setpoint(setpoint)?;
        let controller = config.transfer_function()?;
        let closed = controller.series(plant)?.feedback_unity()?;
        debug!(
            controller = %controller,
            closed_loop = %closed,
            "composed continuous loop"
        );
        Ok(Self {
            setpoint,
            dynamics: Dynamics::Continuous {
                model: closed.to_state_space()?,
            },
        })
    }

    /// Sampled loop with a stateful controller.
    pub fn sampled(
        plant: &TransferFunction,
        controller: PIDController,
        setpoint: f64,
    ) -> SimResult<Self> {
        let setpoint = check_setpoint(setpoint)?;
        let plant = plant.to_state_space()?;
        Ok(Self {
            setpoint,
            dynamics: Dynamics::Sampled {
                plant,
                controller,
                control: 0.0,
            },
        })
    }

    /// Build a closed loop in the requested mode. Sampled loops get a fresh
    /// controller instance built from `config`.
    pub fn closed(
        plant: &TransferFunction,
        config: PidConfig,
        mode: LoopMode,
        setpoint: f64,
    ) -> SimResult<Self> {
        match mode {
            LoopMode::Continuous => Self::continuous(plant, &config, setpoint),
            LoopMode::Sampled => {
                Self::sampled(plant, PIDController::from_config(config), setpoint)
            }
        }
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    pub fn kind(&self) -> LoopKind {
        match self.dynamics {
            Dynamics::Open { .. } => LoopKind::Open,
            Dynamics::Continuous { .. } => LoopKind::Continuous,
            Dynamics::Sampled { .. } => LoopKind::Sampled,
        }
    }

    /// Dimension of the integrated state.
    pub fn state_dim(&self) -> usize {
        self.realization().order()
    }

    /// The stateful controller of a sampled loop.
    pub fn controller(&self) -> Option<&PIDController> {
        match &self.dynamics {
            Dynamics::Sampled { controller, .. } => Some(controller),
            _ => None,
        }
    }

    fn realization(&self) -> &StateSpaceModel {
        match &self.dynamics {
            Dynamics::Open { plant, .. } | Dynamics::Sampled { plant, .. } => plant,
            Dynamics::Continuous { model } => model,
        }
    }

    /// Input currently applied to the integrated realization.
    fn input(&self) -> f64 {
        match &self.dynamics {
            Dynamics::Open { input, .. } => *input,
            Dynamics::Continuous { .. } => self.setpoint,
            Dynamics::Sampled { control, .. } => *control,
        }
    }
}

fn check_setpoint(setpoint: f64) -> SimResult<f64> {
    if setpoint.is_finite() {
        Ok(setpoint)
    } else {
        Err(SimError::InvalidArg {
            what: "setpoint must be finite",
        })
    }
}

impl TransientModel for ClosedLoopSystem {
    type State = DVector<f64>;

    fn initial_state(&self) -> Self::State {
        self.realization().zero_state()
    }

    fn rhs(&mut self, _t: f64, x: &Self::State) -> SimResult<Self::State> {
        Ok(self.realization().derivative(x, self.input()))
    }

    fn output(&self, _t: f64, x: &Self::State) -> f64 {
        self.realization().output(x, self.input())
    }

    fn sample(&mut self, t: f64, x: &Self::State) -> SimResult<()> {
        let setpoint = self.setpoint;
        if let Dynamics::Sampled {
            plant,
            controller,
            control,
        } = &mut self.dynamics
        {
            // Measured output uses the control held over the previous step
            let measured = plant.output(x, *control);
            *control = controller.step(t, setpoint - measured);
        }
        Ok(())
    }

    fn reset(&mut self) {
        if let Dynamics::Sampled {
            controller,
            control,
            ..
        } = &mut self.dynamics
        {
            controller.reset();
            *control = 0.0;
        }
    }

    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
        a + b
    }

    fn scale(&self, a: &Self::State, scale: f64) -> Self::State {
        a * scale
    }
}
