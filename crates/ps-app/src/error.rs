//! Error types for the ps-app service layer.

/// Application error type that wraps errors from the backend crates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Study error: {0}")]
    Project(String),

    #[error("Study validation failed: {0}")]
    Validation(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ps-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<ps_project::ProjectError> for AppError {
    fn from(err: ps_project::ProjectError) -> Self {
        match err {
            ps_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<ps_project::ValidationError> for AppError {
    fn from(err: ps_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<ps_model::ModelError> for AppError {
    fn from(err: ps_model::ModelError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<ps_controls::ControlError> for AppError {
    fn from(err: ps_controls::ControlError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<ps_sim::SimError> for AppError {
    fn from(err: ps_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<ps_results::ResultsError> for AppError {
    fn from(err: ps_results::ResultsError) -> Self {
        match err {
            ps_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}
