//! Result data types.

use ps_controls::PidGains;
use ps_sim::{LoopMode, SimulationResult};
use serde::{Deserialize, Serialize};

use crate::metrics::PerformanceMetrics;

pub type RunId = String;

/// What was simulated in a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunKind {
    /// Plant driven directly by the setpoint step.
    OpenLoop,
    ClosedLoop { gains: PidGains, mode: LoopMode },
}

impl RunKind {
    /// Gains shown in tables; an open loop reads as all-zero gains.
    pub fn gains(&self) -> PidGains {
        match self {
            RunKind::OpenLoop => PidGains::default(),
            RunKind::ClosedLoop { gains, .. } => *gains,
        }
    }
}

/// Everything about a run except its time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub name: String,
    pub kind: RunKind,
    pub setpoint: f64,
    pub step_count: usize,
    pub metrics: PerformanceMetrics,
}

/// A finished run: summary plus the recorded step response.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub summary: RunSummary,
    pub result: SimulationResult,
}

impl RunRecord {
    pub fn run_id(&self) -> &str {
        &self.summary.run_id
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.summary.metrics
    }
}

/// A run that produced no step response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunFailure {
    pub run_id: RunId,
    pub name: String,
    pub reason: String,
}

/// Study-level metrics file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyMetrics {
    pub study: String,
    pub settling_threshold: f64,
    pub runs: Vec<RunSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<RunFailure>,
}
