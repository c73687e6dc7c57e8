//! Study loading, saving, validation, and introspection.

use std::path::Path;

use ps_controls::PidGains;
use ps_project::Study;
use ps_sim::LoopMode;

use crate::error::AppResult;
use crate::run_service::resolve_mode;

/// Summary of a run for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RunListing {
    pub id: String,
    pub name: String,
    /// `None` for open-loop runs.
    pub gains: Option<PidGains>,
    pub mode: Option<LoopMode>,
}

/// Load and validate a study (YAML or JSON, by extension).
pub fn load_study(path: &Path) -> AppResult<Study> {
    Ok(ps_project::load_study(path)?)
}

pub fn save_study(path: &Path, study: &Study) -> AppResult<()> {
    Ok(ps_project::save_study(path, study)?)
}

pub fn validate_study(study: &Study) -> AppResult<()> {
    Ok(ps_project::validate_study(study)?)
}

/// Write the built-in reference study as YAML.
pub fn init_reference_study(path: &Path) -> AppResult<Study> {
    let study = ps_project::reference_study();
    ps_project::save_yaml(path, &study)?;
    Ok(study)
}

/// Every run of the study, sweeps expanded, with the loop mode it will use.
pub fn list_runs(study: &Study, mode_override: Option<LoopMode>) -> Vec<RunListing> {
    study
        .expanded_runs()
        .into_iter()
        .map(|run| {
            let gains = run.controller_gains();
            let mode = gains.map(|_| resolve_mode(study, &run, mode_override));
            RunListing {
                id: run.id,
                name: run.name,
                gains,
                mode,
            }
        })
        .collect()
}
