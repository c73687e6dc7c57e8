//! Study validation logic.

use std::collections::HashSet;

use ps_controls::PidGains;
use ps_model::TransferFunction;

use crate::schema::{HorizonDef, RunDef, STUDY_VERSION, Study, SweepDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(
    field: impl Into<String>,
    value: impl ToString,
    reason: impl Into<String>,
) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_study(study: &Study) -> Result<(), ValidationError> {
    if study.version != STUDY_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: study.version,
        });
    }

    let plant = &study.plant;
    if let Err(e) = TransferFunction::new_strict(&plant.numerator, &plant.denominator) {
        let coefficients = format!("{:?} / {:?}", plant.numerator, plant.denominator);
        return Err(invalid("plant", coefficients, e.to_string()));
    }

    validate_horizon(&study.horizon)?;

    if !study.setpoint.is_finite() || study.setpoint == 0.0 {
        return Err(invalid(
            "setpoint",
            study.setpoint,
            "must be finite and non-zero",
        ));
    }

    let threshold = study.settling_threshold;
    if !threshold.is_finite() || threshold <= 0.0 || threshold >= 1.0 {
        return Err(invalid(
            "settling_threshold",
            threshold,
            "must be in (0, 1)",
        ));
    }

    let mut ids = HashSet::new();
    for run in &study.runs {
        validate_run(run)?;
        if !ids.insert(run.id.clone()) {
            return Err(ValidationError::DuplicateId {
                id: run.id.clone(),
                context: "runs".to_string(),
            });
        }
    }

    for sweep in &study.sweeps {
        validate_sweep(sweep)?;
        if !ids.insert(sweep.id.clone()) {
            return Err(ValidationError::DuplicateId {
                id: sweep.id.clone(),
                context: "sweeps".to_string(),
            });
        }
    }

    // Expanded sweep ids share the namespace of plain runs
    let mut expanded = HashSet::new();
    for run in study.expanded_runs() {
        if !expanded.insert(run.id.clone()) {
            return Err(ValidationError::DuplicateId {
                id: run.id,
                context: format!("study '{}' expanded runs", study.name),
            });
        }
    }

    Ok(())
}

fn validate_horizon(horizon: &HorizonDef) -> Result<(), ValidationError> {
    if !horizon.t_start.is_finite() {
        return Err(invalid(
            "horizon.t_start",
            horizon.t_start,
            "must be finite",
        ));
    }
    if !horizon.t_end.is_finite() || horizon.t_end <= horizon.t_start {
        return Err(invalid(
            "horizon.t_end",
            horizon.t_end,
            "must be finite and greater than t_start",
        ));
    }
    if horizon.step_count < 2 {
        return Err(invalid(
            "horizon.step_count",
            horizon.step_count,
            "must be at least 2",
        ));
    }
    Ok(())
}

/// Run ids become directory names in exported results.
fn validate_id(id: &str, context: &str) -> Result<(), ValidationError> {
    let ok = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(invalid(
            format!("{context}.id"),
            id,
            "must be non-empty ASCII letters, digits, '_' or '-'",
        ))
    }
}

fn validate_gains(gains: &PidGains, field: String) -> Result<(), ValidationError> {
    gains
        .validate()
        .map_err(|e| invalid(field, format!("{gains:?}"), e.to_string()))
}

fn validate_run(run: &RunDef) -> Result<(), ValidationError> {
    validate_id(&run.id, "runs")?;
    if let Some(gains) = &run.gains {
        validate_gains(gains, format!("runs.{}.gains", run.id))?;
    }
    if let Some(limits) = &run.output_limits {
        limits.validate().map_err(|e| {
            invalid(
                format!("runs.{}.output_limits", run.id),
                format!("[{}, {}]", limits.min, limits.max),
                e.to_string(),
            )
        })?;
    }
    Ok(())
}

fn validate_sweep(sweep: &SweepDef) -> Result<(), ValidationError> {
    validate_id(&sweep.id, "sweeps")?;
    validate_gains(&sweep.base, format!("sweeps.{}.base", sweep.id))?;
    if sweep.values.is_empty() {
        return Err(invalid(
            format!("sweeps.{}.values", sweep.id),
            "[]",
            "must list at least one value",
        ));
    }
    if let Some(v) = sweep.values.iter().find(|v| !v.is_finite()) {
        return Err(invalid(
            format!("sweeps.{}.values", sweep.id),
            v,
            "must be finite",
        ));
    }
    Ok(())
}
