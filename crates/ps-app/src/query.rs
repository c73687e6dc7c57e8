//! Query helpers over executed runs.

use ps_results::{MetricsTable, RunRecord, StudyMetrics};

use crate::error::{AppError, AppResult};
use crate::run_service::StudyOutcome;

pub fn find_record<'a>(records: &'a [RunRecord], run_id: &str) -> AppResult<&'a RunRecord> {
    records
        .iter()
        .find(|r| r.run_id() == run_id)
        .ok_or_else(|| AppError::RunNotFound(run_id.to_string()))
}

/// Comparison table in study order.
pub fn metrics_table(records: &[RunRecord]) -> MetricsTable {
    records.iter().map(|r| r.summary.clone()).collect()
}

pub fn study_metrics(outcome: &StudyOutcome) -> StudyMetrics {
    StudyMetrics {
        study: outcome.study_name.clone(),
        settling_threshold: outcome.settling_threshold,
        runs: outcome.records.iter().map(|r| r.summary.clone()).collect(),
        failed: outcome.failures.clone(),
    }
}
