//! Shared application service layer for the surface pressure pipeline.
//!
//! This crate wires the predictor and the field writer together behind a
//! single `predict_and_write` entry point, loads everything from a YAML
//! pipeline file, and provides the request/response contract used by
//! external dispatchers.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod pipeline;

pub use config::{ModelPaths, OutputConfig, PipelineConfig, TemplateConfig};
pub use dispatch::{ComputeRequest, ComputeResponse, ResponseStatus, dispatch, dispatch_json};
pub use error::{AppError, AppResult, ErrorKind};
pub use pipeline::{OutputPaths, Pipeline, Prediction};
