//! PID controller.
//!
//! Provides:
//! - Parallel-form PID `u = Kp e + Ki ∫e dt + Kd de/dt`
//! - Trapezoidal or rectangular integral accumulation
//! - Backward-difference derivative, zero on the first sample
//! - Optional output clamping with conditional-integration anti-windup
//! - The ideal continuous-time controller as a transfer function

use ps_model::TransferFunction;
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// Proportional, integral and derivative gains.
///
/// Any finite values are accepted, including zero and negative gains;
/// stability is the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    #[serde(default)]
    pub ki: f64,
    #[serde(default)]
    pub kd: f64,
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    /// All three gains are zero. Such a tuning means "no controller".
    pub fn is_zero(&self) -> bool {
        self.kp == 0.0 && self.ki == 0.0 && self.kd == 0.0
    }

    pub fn validate(&self) -> ControlResult<()> {
        if !self.kp.is_finite() {
            return Err(ControlError::InvalidArg {
                what: "kp must be finite",
            });
        }
        if !self.ki.is_finite() {
            return Err(ControlError::InvalidArg {
                what: "ki must be finite",
            });
        }
        if !self.kd.is_finite() {
            return Err(ControlError::InvalidArg {
                what: "kd must be finite",
            });
        }
        Ok(())
    }
}

/// How the error integral is accumulated between samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegralRule {
    /// `dt * (e + e_prev) / 2`
    #[default]
    Trapezoidal,
    /// `dt * e`
    Rectangular,
}

/// Output saturation band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputLimits {
    pub min: f64,
    pub max: f64,
}

impl OutputLimits {
    pub fn new(min: f64, max: f64) -> ControlResult<Self> {
        let limits = Self { min, max };
        limits.validate()?;
        Ok(limits)
    }

    pub fn validate(&self) -> ControlResult<()> {
        if self.min.is_nan() || self.max.is_nan() {
            return Err(ControlError::InvalidArg {
                what: "output limits must not be NaN",
            });
        }
        if self.min >= self.max {
            return Err(ControlError::InvalidArg {
                what: "output min must be less than output max",
            });
        }
        Ok(())
    }
}

/// PID controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidConfig {
    pub gains: PidGains,
    #[serde(default)]
    pub integral_rule: IntegralRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_limits: Option<OutputLimits>,
}

impl PidConfig {
    /// Create an unclamped configuration with trapezoidal integration.
    pub fn new(gains: PidGains) -> ControlResult<Self> {
        gains.validate()?;
        Ok(Self {
            gains,
            integral_rule: IntegralRule::default(),
            output_limits: None,
        })
    }

    pub fn with_integral_rule(mut self, rule: IntegralRule) -> Self {
        self.integral_rule = rule;
        self
    }

    /// Clamp the output to `[min, max]`.
    pub fn with_output_limits(mut self, min: f64, max: f64) -> ControlResult<Self> {
        self.output_limits = Some(OutputLimits::new(min, max)?);
        Ok(self)
    }

    /// Compute the control signal for one sample.
    ///
    /// # Arguments
    ///
    /// * `state` - Controller state before this sample
    /// * `t` - Sample time (seconds)
    /// * `error` - Setpoint minus measured output
    ///
    /// # Returns
    ///
    /// Updated state and control value.
    ///
    /// On the first sample (`previous_time` is `None`) there is no interval
    /// to integrate over or differentiate across, so the integral is left
    /// unchanged and the derivative term is zero. A non-positive interval is
    /// treated the same way.
    pub fn update(
        &self,
        state: &PIDControllerState,
        t: f64,
        error: f64,
    ) -> (PIDControllerState, f64) {
        let PidGains { kp, ki, kd } = self.gains;

        let (integral, derivative) = match state.previous_time {
            Some(t_prev) if t > t_prev => {
                let dt = t - t_prev;
                let area = match self.integral_rule {
                    IntegralRule::Trapezoidal => 0.5 * (error + state.previous_error) * dt,
                    IntegralRule::Rectangular => error * dt,
                };
                (state.integral + area, (error - state.previous_error) / dt)
            }
            _ => (state.integral, 0.0),
        };

        let output_raw = kp * error + ki * integral + kd * derivative;

        let (output, integral) = match self.output_limits {
            Some(limits) => {
                let output = output_raw.clamp(limits.min, limits.max);
                // Anti-windup: hold the integral while saturated
                if output == output_raw {
                    (output, integral)
                } else {
                    (output, state.integral)
                }
            }
            None => (output_raw, integral),
        };

        let new_state = PIDControllerState {
            integral,
            previous_error: error,
            previous_time: Some(t),
        };

        (new_state, output)
    }

    /// Ideal continuous-time controller `C(s) = Kp + Ki/s + Kd s`.
    ///
    /// Terms with zero gain are left out so the controller does not add a
    /// pole at the origin unless it integrates:
    ///
    /// | terms | `C(s)` |
    /// |-------|--------|
    /// | P     | `Kp / 1` |
    /// | PD    | `(Kd s + Kp) / 1` |
    /// | PI    | `(Kp s + Ki) / s` |
    /// | PID   | `(Kd s^2 + Kp s + Ki) / s` |
    ///
    /// Output limits are a sampled-controller concept and are ignored here.
    pub fn transfer_function(&self) -> ControlResult<TransferFunction> {
        let PidGains { kp, ki, kd } = self.gains;
        let tf = if ki == 0.0 && kd == 0.0 {
            TransferFunction::new(&[kp], &[1.0])?
        } else if ki == 0.0 {
            TransferFunction::new(&[kd, kp], &[1.0])?
        } else if kd == 0.0 {
            TransferFunction::new(&[kp, ki], &[1.0, 0.0])?
        } else {
            TransferFunction::new(&[kd, kp, ki], &[1.0, 0.0])?
        };
        Ok(tf)
    }
}

/// PID controller state, valid for one simulation run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PIDControllerState {
    /// Integral accumulator.
    pub integral: f64,
    /// Error seen on the previous sample.
    pub previous_error: f64,
    /// Time of the previous sample, `None` before the first one.
    pub previous_time: Option<f64>,
}

/// Stateful PID controller stepped once per integration step.
#[derive(Debug, Clone, PartialEq)]
pub struct PIDController {
    config: PidConfig,
    state: PIDControllerState,
}

impl PIDController {
    /// Create a controller with default options from plain gains.
    pub fn new(gains: PidGains) -> ControlResult<Self> {
        Ok(Self::from_config(PidConfig::new(gains)?))
    }

    pub fn from_config(config: PidConfig) -> Self {
        Self {
            config,
            state: PIDControllerState::default(),
        }
    }

    pub fn config(&self) -> &PidConfig {
        &self.config
    }

    pub fn gains(&self) -> PidGains {
        self.config.gains
    }

    pub fn state(&self) -> &PIDControllerState {
        &self.state
    }

    /// Advance one sample and return the control signal.
    pub fn step(&mut self, current_time: f64, current_error: f64) -> f64 {
        let (state, output) = self.config.update(&self.state, current_time, current_error);
        self.state = state;
        output
    }

    /// Forget all run-scoped state.
    pub fn reset(&mut self) {
        self.state = PIDControllerState::default();
    }

    /// See [`PidConfig::transfer_function`].
    pub fn transfer_function(&self) -> ControlResult<TransferFunction> {
        self.config.transfer_function()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn constant_error_integrates_linearly(
            ki in 0.1_f64..50.0,
            error in -5.0_f64..5.0,
            steps in 2_usize..200,
        ) {
            let dt = 0.01;
            let mut pid = PIDController::new(PidGains::new(0.0, ki, 0.0)).unwrap();
            let mut u = 0.0;
            for k in 0..steps {
                u = pid.step(k as f64 * dt, error);
            }
            let elapsed = (steps - 1) as f64 * dt;
            prop_assert!((u - ki * error * elapsed).abs() <= 1e-9 * (1.0 + u.abs()));
        }

        #[test]
        fn clamped_output_stays_in_band(
            kp in -20.0_f64..20.0,
            ki in -20.0_f64..20.0,
            errors in prop::collection::vec(-10.0_f64..10.0, 1..50),
        ) {
            let config = PidConfig::new(PidGains::new(kp, ki, 0.5))
                .unwrap()
                .with_output_limits(-1.0, 1.0)
                .unwrap();
            let mut pid = PIDController::from_config(config);
            for (k, e) in errors.iter().enumerate() {
                let u = pid.step(k as f64 * 0.05, *e);
                prop_assert!((-1.0..=1.0).contains(&u));
            }
        }
    }
}
