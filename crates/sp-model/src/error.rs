//! Model loading and prediction errors.

use sp_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while loading artifacts or predicting a field.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Unrecognized model variant selector.
    #[error("Invalid model variant: '{name}' (expected 'multi-fidelity' or 'single-fidelity')")]
    InvalidVariant { name: String },

    /// Artifact dimensions disagree with each other or with the field size.
    #[error("Shape mismatch in {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    /// Flight condition outside the training domain under `DomainPolicy::Reject`.
    #[error("{parameter} = {value} is outside the training domain [{lo}, {hi}]")]
    OutOfDomain {
        parameter: &'static str,
        value: f64,
        lo: f64,
        hi: f64,
    },

    /// Non-finite or otherwise unusable numeric input.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] CoreError),

    /// Artifact content is structurally valid JSON but semantically unusable.
    #[error("Invalid artifact {what}: {message}")]
    InvalidArtifact { what: String, message: String },

    #[error("Failed to read artifact: {path}")]
    ArtifactRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse artifact {path}: {source}")]
    ArtifactParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl ModelError {
    pub(crate) fn shape(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        ModelError::ShapeMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }

    pub(crate) fn invalid(what: impl Into<String>, message: impl Into<String>) -> Self {
        ModelError::InvalidArtifact {
            what: what.into(),
            message: message.into(),
        }
    }
}
