//! ps-project: study file format and validation.
//!
//! A study names one plant, one simulation horizon and any number of
//! controller tunings (single runs or gain sweeps) to compare.

pub mod reference;
pub mod schema;
pub mod validate;

use std::path::Path;

pub use reference::reference_study;
pub use schema::*;
pub use validate::{ValidationError, validate_study};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unknown study file extension: {path}")]
    UnknownFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ProjectResult<Study> {
    let content = std::fs::read_to_string(path)?;
    let study: Study = serde_yaml::from_str(&content)?;
    validate_study(&study)?;
    Ok(study)
}

pub fn save_yaml(path: &Path, study: &Study) -> ProjectResult<()> {
    validate_study(study)?;
    let content = serde_yaml::to_string(study)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<Study> {
    let content = std::fs::read_to_string(path)?;
    let study: Study = serde_json::from_str(&content)?;
    validate_study(&study)?;
    Ok(study)
}

pub fn save_json(path: &Path, study: &Study) -> ProjectResult<()> {
    validate_study(study)?;
    let content = serde_json::to_string_pretty(study)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a study, picking the format from the file extension
/// (`.yaml`/`.yml` or `.json`).
pub fn load_study(path: &Path) -> ProjectResult<Study> {
    match extension(path).as_deref() {
        Some("yaml" | "yml") => load_yaml(path),
        Some("json") => load_json(path),
        _ => Err(ProjectError::UnknownFormat {
            path: path.display().to_string(),
        }),
    }
}

pub fn save_study(path: &Path, study: &Study) -> ProjectResult<()> {
    match extension(path).as_deref() {
        Some("yaml" | "yml") => save_yaml(path, study),
        Some("json") => save_json(path, study),
        _ => Err(ProjectError::UnknownFormat {
            path: path.display().to_string(),
        }),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
