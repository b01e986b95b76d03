//! Error types for the sp-app service layer.

use serde::{Deserialize, Serialize};
use sp_field::FieldError;
use sp_model::ModelError;
use std::fmt;
use std::path::PathBuf;

/// Application error type that wraps errors from the model and field crates
/// and provides a unified error interface for the CLI and dispatchers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read pipeline file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse pipeline file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Predictor field length {predictor} does not match template data rows {template}")]
    FieldDimMismatch { predictor: usize, template: usize },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Console I/O error: {0}")]
    Console(#[from] std::io::Error),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Field error: {0}")]
    Field(#[from] FieldError),
}

/// Result type for sp-app operations.
pub type AppResult<T> = Result<T, AppError>;

/// Failure categories reported to external callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidVariant,
    ShapeMismatch,
    TemplateShapeMismatch,
    FieldLengthMismatch,
    #[serde(rename = "IOFailure")]
    IoFailure,
    OutOfDomain,
    InvalidInput,
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidVariant => "InvalidVariant",
            ErrorKind::ShapeMismatch => "ShapeMismatch",
            ErrorKind::TemplateShapeMismatch => "TemplateShapeMismatch",
            ErrorKind::FieldLengthMismatch => "FieldLengthMismatch",
            ErrorKind::IoFailure => "IOFailure",
            ErrorKind::OutOfDomain => "OutOfDomain",
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::Config => "Config",
        };
        f.write_str(name)
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Config(_) | AppError::ConfigParse { .. } => ErrorKind::Config,
            AppError::ConfigFileRead { .. } | AppError::Console(_) => ErrorKind::IoFailure,
            AppError::FieldDimMismatch { .. } => ErrorKind::ShapeMismatch,
            AppError::InvalidRequest(_) => ErrorKind::InvalidInput,
            AppError::Model(err) => match err {
                ModelError::InvalidVariant { .. } => ErrorKind::InvalidVariant,
                ModelError::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
                ModelError::OutOfDomain { .. } => ErrorKind::OutOfDomain,
                ModelError::InvalidInput(_) => ErrorKind::InvalidInput,
                ModelError::InvalidArtifact { .. } | ModelError::ArtifactParse { .. } => {
                    ErrorKind::Config
                }
                ModelError::ArtifactRead { .. } => ErrorKind::IoFailure,
            },
            AppError::Field(err) => match err {
                FieldError::TemplateShapeMismatch { .. }
                | FieldError::TemplateVersionMismatch { .. } => ErrorKind::TemplateShapeMismatch,
                FieldError::FieldLengthMismatch { .. } => ErrorKind::FieldLengthMismatch,
                FieldError::InvalidLayout { .. } => ErrorKind::Config,
                FieldError::InvalidField(_) => ErrorKind::InvalidInput,
                FieldError::TemplateRead { .. } | FieldError::OutputWrite { .. } => {
                    ErrorKind::IoFailure
                }
            },
        }
    }
}
