//! Recorded step response.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Output trajectory of one simulation run.
///
/// Invariants (checked on construction and deserialization):
/// - `time` and `output` have the same, non-zero length
/// - `time` is strictly increasing
/// - every value and the setpoint are finite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SimulationResultData")]
pub struct SimulationResult {
    time: Vec<f64>,
    output: Vec<f64>,
    setpoint: f64,
}

#[derive(Deserialize)]
struct SimulationResultData {
    time: Vec<f64>,
    output: Vec<f64>,
    setpoint: f64,
}

impl TryFrom<SimulationResultData> for SimulationResult {
    type Error = SimError;

    fn try_from(data: SimulationResultData) -> SimResult<Self> {
        Self::new(data.time, data.output, data.setpoint)
    }
}

impl SimulationResult {
    pub fn new(time: Vec<f64>, output: Vec<f64>, setpoint: f64) -> SimResult<Self> {
        if time.is_empty() {
            return Err(SimError::InvalidResult {
                what: "time series is empty",
            });
        }
        if time.len() != output.len() {
            return Err(SimError::InvalidResult {
                what: "time and output lengths differ",
            });
        }
        if !setpoint.is_finite() {
            return Err(SimError::InvalidResult {
                what: "setpoint must be finite",
            });
        }
        if time.iter().chain(&output).any(|v| !v.is_finite()) {
            return Err(SimError::InvalidResult {
                what: "series contains non-finite values",
            });
        }
        if time.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SimError::InvalidResult {
                what: "time must be strictly increasing",
            });
        }
        Ok(Self {
            time,
            output,
            setpoint,
        })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn output(&self) -> &[f64] {
        &self.output
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    /// Number of samples (always at least one).
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn final_time(&self) -> f64 {
        self.time[self.time.len() - 1]
    }

    pub fn final_value(&self) -> f64 {
        self.output[self.output.len() - 1]
    }

    /// `(t, y)` pairs in time order.
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time.iter().copied().zip(self.output.iter().copied())
    }
}
