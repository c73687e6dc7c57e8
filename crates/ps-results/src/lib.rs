//! ps-results: step-response metrics, run records and run export.

pub mod metrics;
pub mod report;
pub mod store;
pub mod types;

pub use metrics::{DEFAULT_SETTLING_THRESHOLD, MetricsExtractor, PerformanceMetrics};
pub use report::MetricsTable;
pub use store::{RunStore, parse_series_csv, write_series_csv};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed series at line {line}: {reason}")]
    Series { line: usize, reason: String },

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error(transparent)]
    Sim(#[from] ps_sim::SimError),
}
