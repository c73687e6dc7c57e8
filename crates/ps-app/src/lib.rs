//! Shared application service layer for pidsim.
//!
//! Centralizes study management, run execution and result querying so the
//! CLI stays a thin front end.

pub mod error;
pub mod project_service;
pub mod query;
pub mod run_service;

pub use error::{AppError, AppResult};
pub use project_service::{
    RunListing, init_reference_study, list_runs, load_study, save_study, validate_study,
};
pub use query::{find_record, metrics_table, study_metrics};
pub use run_service::{
    StudyOptions, StudyOutcome, build_system, compile_plant, execute_run, execute_run_by_id,
    execute_study, export_study, resolve_mode, sim_options,
};
