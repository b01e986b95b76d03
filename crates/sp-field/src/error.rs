//! Template and field-writer errors.

use sp_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

pub type FieldResult<T> = Result<T, FieldError>;

#[derive(Error, Debug)]
pub enum FieldError {
    /// Template file no longer matches its layout descriptor.
    #[error("Template shape mismatch in {path}: {detail}")]
    TemplateShapeMismatch { path: PathBuf, detail: String },

    /// Template content hash differs from the pinned version.
    #[error("Template version mismatch in {path}: expected sha256 {expected}, found {actual}")]
    TemplateVersionMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// Layout descriptor itself is unusable.
    #[error("Invalid template layout: {what}")]
    InvalidLayout { what: String },

    #[error("Field length mismatch: template has {expected} data rows, field has {actual} values")]
    FieldLengthMismatch { expected: usize, actual: usize },

    #[error("Invalid field: {0}")]
    InvalidField(#[from] CoreError),

    #[error("Failed to read template: {path}")]
    TemplateRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write output file: {path}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}
