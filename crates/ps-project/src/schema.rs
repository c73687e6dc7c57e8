//! Study schema definitions.

use ps_controls::{IntegralRule, OutputLimits, PidGains};
use ps_sim::{IntegratorType, LoopMode};
use serde::{Deserialize, Serialize};

pub const STUDY_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Study {
    pub version: u32,
    pub name: String,
    pub plant: PlantDef,
    #[serde(default)]
    pub horizon: HorizonDef,
    #[serde(default = "default_setpoint")]
    pub setpoint: f64,
    #[serde(default = "default_settling_threshold")]
    pub settling_threshold: f64,
    #[serde(default)]
    pub integrator: IntegratorType,
    #[serde(default)]
    pub loop_mode: LoopMode,
    #[serde(default)]
    pub runs: Vec<RunDef>,
    #[serde(default)]
    pub sweeps: Vec<SweepDef>,
}

fn default_setpoint() -> f64 {
    1.0
}

fn default_settling_threshold() -> f64 {
    0.02
}

/// Plant transfer function, coefficients highest power first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantDef {
    pub numerator: Vec<f64>,
    pub denominator: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HorizonDef {
    #[serde(default)]
    pub t_start: f64,
    pub t_end: f64,
    pub step_count: usize,
}

impl Default for HorizonDef {
    fn default() -> Self {
        Self {
            t_start: 0.0,
            t_end: 5.0,
            step_count: 501,
        }
    }
}

/// One simulated tuning. No gains (or all-zero gains) means open loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunDef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gains: Option<PidGains>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_mode: Option<LoopMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integral_rule: Option<IntegralRule>,
    /// Controller saturation; only a sampled loop can honor it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_limits: Option<OutputLimits>,
}

impl RunDef {
    pub fn closed(id: &str, name: &str, gains: PidGains) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            gains: Some(gains),
            loop_mode: None,
            integral_rule: None,
            output_limits: None,
        }
    }

    pub fn open(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            gains: None,
            loop_mode: None,
            integral_rule: None,
            output_limits: None,
        }
    }

    /// Gains of a closed-loop run; `None` for an open-loop run.
    pub fn controller_gains(&self) -> Option<PidGains> {
        self.gains.filter(|g| !g.is_zero())
    }

    pub fn is_open_loop(&self) -> bool {
        self.controller_gains().is_none()
    }
}

/// Which gain a sweep varies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GainName {
    Kp,
    Ki,
    Kd,
}

impl GainName {
    pub fn label(self) -> &'static str {
        match self {
            GainName::Kp => "Kp",
            GainName::Ki => "Ki",
            GainName::Kd => "Kd",
        }
    }

    /// `base` with this gain replaced by `value`.
    pub fn apply(self, base: PidGains, value: f64) -> PidGains {
        match self {
            GainName::Kp => PidGains { kp: value, ..base },
            GainName::Ki => PidGains { ki: value, ..base },
            GainName::Kd => PidGains { kd: value, ..base },
        }
    }
}

/// A family of runs differing in one gain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepDef {
    pub id: String,
    pub name: String,
    pub base: PidGains,
    pub vary: GainName,
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_mode: Option<LoopMode>,
}

impl SweepDef {
    /// One run per value, ids `<sweep id>_<n>` counting from 1.
    pub fn expand(&self) -> Vec<RunDef> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &value)| RunDef {
                id: format!("{}_{}", self.id, i + 1),
                name: format!("{} ({}={})", self.name, self.vary.label(), value),
                gains: Some(self.vary.apply(self.base, value)),
                loop_mode: self.loop_mode,
                integral_rule: None,
                output_limits: None,
            })
            .collect()
    }
}

impl Study {
    /// Plain runs followed by every sweep's expansion, in file order.
    pub fn expanded_runs(&self) -> Vec<RunDef> {
        let mut runs = self.runs.clone();
        for sweep in &self.sweeps {
            runs.extend(sweep.expand());
        }
        runs
    }

    pub fn find_run(&self, id: &str) -> Option<RunDef> {
        self.expanded_runs().into_iter().find(|r| r.id == id)
    }
}
