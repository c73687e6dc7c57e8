//! Step-response performance metrics.
//!
//! Computes overshoot, settling time, steady-state error, rise time and peak
//! data from a recorded step response. All quantities are measured against
//! the setpoint of the run, not the final value of the response.

use ps_sim::SimulationResult;
use serde::{Deserialize, Serialize};

use crate::{ResultsError, ResultsResult};

/// Settling band used when none is configured (±2 % of the setpoint).
pub const DEFAULT_SETTLING_THRESHOLD: f64 = 0.02;

const RISE_LOW: f64 = 0.1;
const RISE_HIGH: f64 = 0.9;

/// Standard step-response metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Peak excursion past the setpoint in percent of |setpoint| (never negative)
    pub overshoot_percent: f64,
    /// Time after which the output stays inside the settling band (seconds).
    /// `None` when the response is still outside the band at the end of the run.
    pub settling_time: Option<f64>,
    /// Setpoint minus final output
    pub steady_state_error: f64,
    /// Time from 10 % to 90 % of the setpoint (seconds)
    pub rise_time: Option<f64>,
    /// Extreme output in the direction of the setpoint
    pub peak_value: f64,
    /// Time of the first sample at `peak_value` (seconds)
    pub peak_time: f64,
    pub final_value: f64,
}

impl PerformanceMetrics {
    pub fn is_settled(&self) -> bool {
        self.settling_time.is_some()
    }
}

/// Extracts [`PerformanceMetrics`] with a fixed settling band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsExtractor {
    threshold: f64,
}

impl Default for MetricsExtractor {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SETTLING_THRESHOLD,
        }
    }
}

impl MetricsExtractor {
    /// `threshold` is the settling band as a fraction of |setpoint|, in (0, 1).
    pub fn new(threshold: f64) -> ResultsResult<Self> {
        if !threshold.is_finite() || threshold <= 0.0 || threshold >= 1.0 {
            return Err(ResultsError::InvalidArg {
                what: "settling threshold must be in (0, 1)",
            });
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn extract(&self, result: &SimulationResult) -> PerformanceMetrics {
        let time = result.time();
        let output = result.output();
        let sp = result.setpoint();

        let (peak_idx, peak_value) = peak(output, sp);
        let final_value = result.final_value();

        PerformanceMetrics {
            overshoot_percent: overshoot_percent(peak_value, sp),
            settling_time: settling_time(time, output, sp, self.threshold),
            steady_state_error: sp - final_value,
            rise_time: rise_time(time, output, sp),
            peak_value,
            peak_time: time[peak_idx],
            final_value,
        }
    }
}

/// Index and value of the first extreme sample in the setpoint direction.
fn peak(output: &[f64], sp: f64) -> (usize, f64) {
    let mut best = (0, output[0]);
    for (i, &y) in output.iter().enumerate().skip(1) {
        let better = if sp < 0.0 { y < best.1 } else { y > best.1 };
        if better {
            best = (i, y);
        }
    }
    best
}

fn overshoot_percent(peak: f64, sp: f64) -> f64 {
    if sp == 0.0 {
        return 0.0;
    }
    // Signed so that positive means "past the setpoint" for either sign of sp
    let excess = (peak - sp) * sp.signum();
    (excess / sp.abs() * 100.0).max(0.0)
}

/// Scan backward for the last sample outside the band; the response is
/// settled from the sample after it.
fn settling_time(time: &[f64], output: &[f64], sp: f64, threshold: f64) -> Option<f64> {
    let band = if sp == 0.0 {
        threshold
    } else {
        threshold * sp.abs()
    };
    let last = output.len() - 1;
    match output.iter().rposition(|y| (y - sp).abs() > band) {
        None => Some(time[0]),
        Some(i) if i == last => None,
        Some(i) => Some(time[i + 1]),
    }
}

fn rise_time(time: &[f64], output: &[f64], sp: f64) -> Option<f64> {
    if sp == 0.0 {
        return None;
    }
    let t_low = time_to_fraction(time, output, sp, RISE_LOW)?;
    let t_high = time_to_fraction(time, output, sp, RISE_HIGH)?;
    Some(t_high - t_low)
}

/// First time the output reaches `fraction * sp`, interpolated linearly
/// between the bracketing samples.
fn time_to_fraction(time: &[f64], output: &[f64], sp: f64, fraction: f64) -> Option<f64> {
    let target = fraction * sp;
    let reached = |y: f64| if sp > 0.0 { y >= target } else { y <= target };

    if reached(output[0]) {
        return Some(time[0]);
    }
    for i in 1..output.len() {
        if reached(output[i]) {
            let (t0, y0) = (time[i - 1], output[i - 1]);
            let (t1, y1) = (time[i], output[i]);
            let dy = y1 - y0;
            if dy.abs() > f64::EPSILON {
                return Some(t0 + (target - y0) / dy * (t1 - t0));
            }
            return Some(t1);
        }
    }
    None
}
