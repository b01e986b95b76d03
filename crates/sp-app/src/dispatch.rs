//! Request/response contract for external dispatchers.
//!
//! Mirrors the `/compute` endpoint the visualization front end calls:
//!
//! ```json
//! { "mach": 6.0, "alpha": 4.0, "beta": 4.0, "solver": "multi-fidelity" }
//! ```
//!
//! answered with
//!
//! ```json
//! { "status": "success", "output_file": "render_data/MF_prediction.dat" }
//! ```

use crate::error::{AppError, ErrorKind};
use crate::pipeline::Pipeline;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeRequest {
    pub mach: f64,
    pub alpha: f64,
    pub beta: f64,
    /// Model variant name.
    pub solver: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeResponse {
    pub status: ResponseStatus,
    pub output_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComputeResponse {
    pub fn success(output_file: String) -> Self {
        Self {
            status: ResponseStatus::Success,
            output_file: Some(output_file),
            error_kind: None,
            message: None,
        }
    }

    pub fn failure(err: &AppError) -> Self {
        Self {
            status: ResponseStatus::Error,
            output_file: None,
            error_kind: Some(err.kind()),
            message: Some(err.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

/// Serve one request. Failures become `status: "error"` responses.
pub fn dispatch(pipeline: &Pipeline, request: &ComputeRequest) -> ComputeResponse {
    tracing::info!(
        mach = request.mach,
        alpha = request.alpha,
        beta = request.beta,
        solver = %request.solver,
        "received compute request"
    );
    match pipeline.predict_and_write_named(&request.solver, request.mach, request.alpha, request.beta) {
        Ok(prediction) => {
            ComputeResponse::success(prediction.output_path.to_string_lossy().into_owned())
        }
        Err(err) => {
            tracing::warn!(kind = %err.kind(), error = %err, "compute request failed");
            ComputeResponse::failure(&err)
        }
    }
}

/// Serve one JSON-encoded request.
pub fn dispatch_json(pipeline: &Pipeline, line: &str) -> ComputeResponse {
    match serde_json::from_str::<ComputeRequest>(line) {
        Ok(request) => dispatch(pipeline, &request),
        Err(e) => {
            let err = AppError::InvalidRequest(e.to_string());
            tracing::warn!(error = %err, "malformed compute request");
            ComputeResponse::failure(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_external_field_names() {
        let request: ComputeRequest = serde_json::from_str(
            r#"{"mach": 6.0, "alpha": 4.0, "beta": 4.0, "solver": "multi-fidelity"}"#,
        )
        .unwrap();
        assert_eq!(request.solver, "multi-fidelity");
        assert_eq!(request.mach, 6.0);
    }

    #[test]
    fn success_response_shape() {
        let json = serde_json::to_value(ComputeResponse::success("out/MF.dat".into())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "status": "success", "output_file": "out/MF.dat" })
        );
    }

    #[test]
    fn failure_response_shape() {
        let err = AppError::InvalidRequest("missing field `solver`".into());
        let json = serde_json::to_value(ComputeResponse::failure(&err)).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["output_file"], serde_json::Value::Null);
        assert_eq!(json["error_kind"], "InvalidInput");
        assert!(json["message"].as_str().unwrap().contains("solver"));
    }
}
