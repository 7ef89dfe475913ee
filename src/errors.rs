use std::io;

use thiserror::Error;

use crate::types::ComponentName;

/// Error type for the tagger/scorer trait boundary.
///
/// Kept separate from [`PipelineError`] so callers can distinguish "no aspect
/// found" from "the model failed on this input". The pipeline recovers from
/// these locally; they never abort an analysis.
#[derive(Debug, Error)]
#[error("model component '{component}' failed: {reason}")]
pub struct ModelError {
    /// Which external model reported the failure.
    pub component: ComponentName,
    /// Human-readable failure description from the implementation.
    pub reason: String,
}

impl ModelError {
    /// Build a model error for `component` with the given reason.
    pub fn new(component: impl Into<ComponentName>, reason: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            reason: reason.into(),
        }
    }
}

/// Error type for dictionary loading, dataset preparation, and IO failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("aspect dictionary is malformed: {0}")]
    Dictionary(String),
    #[error("annotation data is malformed: {0}")]
    Dataset(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("configuration error: {0}")]
    Configuration(String),
}
