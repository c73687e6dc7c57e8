//! Run execution and export service.

use ps_controls::PidConfig;
use ps_model::TransferFunction;
use ps_project::{RunDef, Study};
use ps_results::{
    MetricsExtractor, RunFailure, RunKind, RunRecord, RunStore, RunSummary, StudyMetrics,
};
use ps_sim::{ClosedLoopSystem, LoopMode, SimOptions, simulate};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::query;

/// Options for executing a study.
#[derive(Debug, Clone, Copy)]
pub struct StudyOptions {
    /// Forces every closed-loop run into this mode.
    pub mode_override: Option<LoopMode>,
    /// Run independent simulations on the rayon thread pool.
    pub parallel: bool,
}

impl Default for StudyOptions {
    fn default() -> Self {
        Self {
            mode_override: None,
            parallel: true,
        }
    }
}

/// Finished runs of a study, in study order.
#[derive(Debug, Clone)]
pub struct StudyOutcome {
    pub study_name: String,
    pub settling_threshold: f64,
    pub records: Vec<RunRecord>,
    /// Runs that aborted, e.g. a diverging tuning.
    pub failures: Vec<RunFailure>,
}

pub fn compile_plant(study: &Study) -> AppResult<TransferFunction> {
    let plant = TransferFunction::new_strict(&study.plant.numerator, &study.plant.denominator)?;
    debug!(plant = %plant, "compiled plant");
    Ok(plant)
}

pub fn sim_options(study: &Study) -> SimOptions {
    SimOptions::new(
        study.horizon.t_start,
        study.horizon.t_end,
        study.horizon.step_count,
    )
    .with_integrator(study.integrator)
}

/// Override beats the run's own mode, which beats the study default.
pub fn resolve_mode(study: &Study, run: &RunDef, mode_override: Option<LoopMode>) -> LoopMode {
    mode_override
        .or(run.loop_mode)
        .unwrap_or(study.loop_mode)
}

/// Build a fresh system for one run. Each call creates its own controller.
pub fn build_system(
    study: &Study,
    plant: &TransferFunction,
    run: &RunDef,
    mode_override: Option<LoopMode>,
) -> AppResult<(ClosedLoopSystem, RunKind)> {
    let Some(gains) = run.controller_gains() else {
        let system = ClosedLoopSystem::open_loop(plant, study.setpoint)?;
        return Ok((system, RunKind::OpenLoop));
    };

    let mode = resolve_mode(study, run, mode_override);
    let mut config = PidConfig::new(gains)?;
    if let Some(rule) = run.integral_rule {
        config = config.with_integral_rule(rule);
    }
    if let Some(limits) = run.output_limits {
        if mode == LoopMode::Sampled {
            config = config.with_output_limits(limits.min, limits.max)?;
        } else {
            warn!(run = %run.id, "output limits need a sampled loop; ignored");
        }
    }

    let system = ClosedLoopSystem::closed(plant, config, mode, study.setpoint)?;
    Ok((system, RunKind::ClosedLoop { gains, mode }))
}

/// Simulate one run and extract its metrics.
pub fn execute_run(
    study: &Study,
    plant: &TransferFunction,
    run: &RunDef,
    options: &StudyOptions,
) -> AppResult<RunRecord> {
    let (mut system, kind) = build_system(study, plant, run, options.mode_override)?;
    let opts = sim_options(study);
    let result = simulate(&mut system, &opts)?;

    let extractor = MetricsExtractor::new(study.settling_threshold)?;
    let metrics = extractor.extract(&result);

    info!(
        run = %run.id,
        overshoot_percent = metrics.overshoot_percent,
        settling_time = ?metrics.settling_time,
        steady_state_error = metrics.steady_state_error,
        "run complete"
    );
    if !metrics.is_settled() && matches!(kind, RunKind::ClosedLoop { .. }) {
        warn!(
            run = %run.id,
            t_end = opts.t_end,
            "closed loop did not settle within the horizon"
        );
    }

    Ok(RunRecord {
        summary: RunSummary {
            run_id: run.id.clone(),
            name: run.name.clone(),
            kind,
            setpoint: study.setpoint,
            step_count: opts.step_count,
            metrics,
        },
        result,
    })
}

/// Execute one run of the study, looked up by id (sweep runs included).
pub fn execute_run_by_id(
    study: &Study,
    run_id: &str,
    options: &StudyOptions,
) -> AppResult<RunRecord> {
    ps_project::validate_study(study)?;
    let run = study
        .find_run(run_id)
        .ok_or_else(|| AppError::RunNotFound(run_id.to_string()))?;
    let plant = compile_plant(study)?;
    execute_run(study, &plant, &run, options)
}

/// Execute every run of a study.
///
/// An invalid study or plant aborts the whole study. A run that fails on its
/// own is logged and listed in [`StudyOutcome::failures`]; the other runs
/// still report.
pub fn execute_study(study: &Study, options: &StudyOptions) -> AppResult<StudyOutcome> {
    ps_project::validate_study(study)?;
    let plant = compile_plant(study)?;
    let runs = study.expanded_runs();
    info!(
        study = %study.name,
        runs = runs.len(),
        parallel = options.parallel,
        "executing study"
    );

    let results: Vec<AppResult<RunRecord>> = if options.parallel {
        runs.par_iter()
            .map(|run| execute_run(study, &plant, run, options))
            .collect()
    } else {
        runs.iter()
            .map(|run| execute_run(study, &plant, run, options))
            .collect()
    };

    let mut records = Vec::with_capacity(runs.len());
    let mut failures = Vec::new();
    for (run, result) in runs.iter().zip(results) {
        match result {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(run = %run.id, error = %err, "run failed");
                failures.push(RunFailure {
                    run_id: run.id.clone(),
                    name: run.name.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(StudyOutcome {
        study_name: study.name.clone(),
        settling_threshold: study.settling_threshold,
        records,
        failures,
    })
}

/// Write every run and the study-level metrics file to `store`.
pub fn export_study(outcome: &StudyOutcome, store: &RunStore) -> AppResult<StudyMetrics> {
    for record in &outcome.records {
        store.save_run(record)?;
    }
    let metrics = query::study_metrics(outcome);
    store.save_study_metrics(&metrics)?;
    info!(
        dir = %store.root_dir().display(),
        runs = outcome.records.len(),
        "exported study"
    );
    Ok(metrics)
}
