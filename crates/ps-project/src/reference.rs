//! Built-in DC motor speed-control study.

use ps_controls::PidGains;
use ps_sim::{IntegratorType, LoopMode};

use crate::schema::{GainName, HorizonDef, PlantDef, RunDef, STUDY_VERSION, Study, SweepDef};

/// Ziegler-Nichols tuning for the motor model.
pub const ZIEGLER_NICHOLS: PidGains = PidGains {
    kp: 14.52,
    ki: 48.56,
    kd: 1.085,
};

/// Hand-tuned gains for the motor model.
pub const MANUAL_TUNE: PidGains = PidGains {
    kp: 10.0,
    ki: 40.0,
    kd: 1.5,
};

/// Motor `5 / (s^2 + 11 s + 10)` under no control, P, PD, PI and PID
/// tuning, followed by the final comparison runs.
pub fn reference_study() -> Study {
    Study {
        version: STUDY_VERSION,
        name: "DC motor speed control".to_string(),
        plant: PlantDef {
            numerator: vec![5.0],
            denominator: vec![1.0, 11.0, 10.0],
        },
        horizon: HorizonDef::default(),
        setpoint: 1.0,
        settling_threshold: 0.02,
        integrator: IntegratorType::Rk4,
        loop_mode: LoopMode::Continuous,
        runs: vec![
            RunDef::open("uncontrolled", "Uncontrolled"),
            RunDef::closed("ziegler_nichols", "Ziegler-Nichols", ZIEGLER_NICHOLS),
            RunDef::closed("manual", "Manual Tune", MANUAL_TUNE),
        ],
        sweeps: vec![
            sweep(
                "p_only",
                "P only",
                PidGains::new(0.0, 0.0, 0.0),
                GainName::Kp,
                &[5.0, 10.0, 15.0],
            ),
            sweep(
                "pd",
                "PD",
                PidGains::new(10.0, 0.0, 0.0),
                GainName::Kd,
                &[0.5, 1.0, 2.0],
            ),
            sweep(
                "pi",
                "PI",
                PidGains::new(10.0, 0.0, 0.0),
                GainName::Ki,
                &[5.0, 20.0, 50.0],
            ),
            sweep(
                "pid",
                "PID",
                PidGains::new(10.0, 40.0, 0.0),
                GainName::Kd,
                &[0.5, 1.0, 1.5],
            ),
        ],
    }
}

fn sweep(id: &str, name: &str, base: PidGains, vary: GainName, values: &[f64]) -> SweepDef {
    SweepDef {
        id: id.to_string(),
        name: name.to_string(),
        base,
        vary,
        values: values.to_vec(),
        loop_mode: None,
    }
}
