//! On-disk JSON artifact formats and loaders.
//!
//! Model artifact:
//!
//! ```json
//! {
//!   "name": "MF_clf",
//!   "output": "latent",
//!   "regressor": { "kind": "polynomial", "degree": 2, "coefficients": [[...]], "intercept": [...] },
//!   "target_scaler": { "mean": [...], "scale": [...] }
//! }
//! ```
//!
//! Basis artifact:
//!
//! ```json
//! { "field_dim": 55966, "latent_dim": 8, "modes": [...], "mean": [...] }
//! ```
//!
//! `modes` is row-major `field_dim × latent_dim`.

use crate::basis::ReducedBasis;
use crate::condition::TrainingDomain;
use crate::error::{ModelError, ModelResult};
use crate::predictor::{Decoder, TrainedModel};
use crate::regressor::{GaussianProcessRegressor, PolynomialRegressor, Regressor, TargetScaler};
use nalgebra::{DMatrix, DVector};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// What the regressor emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// POD coefficients, expanded through the shared basis.
    Latent,
    /// The full field, one value per surface point.
    Field,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorDef {
    Polynomial {
        degree: u32,
        #[serde(default = "default_true")]
        include_bias: bool,
        /// One row per output, one column per polynomial feature.
        coefficients: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
    GaussianProcess {
        train_inputs: Vec<[f64; 3]>,
        /// One row per training point, one column per output.
        dual_coef: Vec<Vec<f64>>,
        length_scale: Vec<f64>,
        #[serde(default = "default_amplitude")]
        amplitude: f64,
    },
}

fn default_true() -> bool {
    true
}

fn default_amplitude() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetScalerDef {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub output: OutputKind,
    pub regressor: RegressorDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_scaler: Option<TargetScalerDef>,
    /// Training box; the hypersonic default when absent.
    #[serde(default)]
    pub domain: TrainingDomain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasisArtifact {
    pub field_dim: usize,
    pub latent_dim: usize,
    pub modes: Vec<f64>,
    pub mean: Vec<f64>,
}

/// Stack equal-length rows into a matrix.
fn matrix_from_rows(rows: &[Vec<f64>], what: &str) -> ModelResult<DMatrix<f64>> {
    let ncols = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().find(|r| r.len() != ncols) {
        return Err(ModelError::shape(format!("{what} row length"), ncols, bad.len()));
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Ok(DMatrix::from_row_slice(rows.len(), ncols, &flat))
}

impl RegressorDef {
    pub fn build(&self) -> ModelResult<Box<dyn Regressor>> {
        match self {
            RegressorDef::Polynomial {
                degree,
                include_bias,
                coefficients,
                intercept,
            } => {
                let coefficients = matrix_from_rows(coefficients, "polynomial coefficients")?;
                let intercept = DVector::from_column_slice(intercept);
                Ok(Box::new(PolynomialRegressor::new(
                    *degree,
                    *include_bias,
                    coefficients,
                    intercept,
                )?))
            }
            RegressorDef::GaussianProcess {
                train_inputs,
                dual_coef,
                length_scale,
                amplitude,
            } => {
                let flat: Vec<f64> = train_inputs.iter().flatten().copied().collect();
                let train_inputs = DMatrix::from_row_slice(train_inputs.len(), 3, &flat);
                let dual_coef = matrix_from_rows(dual_coef, "gaussian process dual coefficients")?;
                Ok(Box::new(GaussianProcessRegressor::new(
                    train_inputs,
                    dual_coef,
                    length_scale,
                    *amplitude,
                )?))
            }
        }
    }
}

impl ModelArtifact {
    /// Resolve the artifact into a model. Latent models require `basis`.
    pub fn into_model(self, basis: Option<&Arc<ReducedBasis>>) -> ModelResult<TrainedModel> {
        let regressor = self.regressor.build()?;
        let target_scaler = self
            .target_scaler
            .map(|s| {
                TargetScaler::new(
                    DVector::from_vec(s.mean),
                    DVector::from_vec(s.scale),
                )
            })
            .transpose()?;

        let decoder = match self.output {
            OutputKind::Latent => {
                let basis = basis.ok_or_else(|| {
                    ModelError::invalid(
                        format!("model '{}'", self.name),
                        "latent output requires a reduced basis",
                    )
                })?;
                Decoder::Basis(Arc::clone(basis))
            }
            OutputKind::Field => Decoder::Identity {
                field_dim: regressor.output_dim(),
            },
        };

        TrainedModel::new(self.name, self.domain, regressor, target_scaler, decoder)
    }
}

impl BasisArtifact {
    pub fn into_basis(self) -> ModelResult<ReducedBasis> {
        let what = format!("basis modes ({} × {})", self.field_dim, self.latent_dim);
        let expected = match self.field_dim.checked_mul(self.latent_dim) {
            Some(n) => n,
            None => return Err(ModelError::shape(what, usize::MAX, self.modes.len())),
        };
        if self.modes.len() != expected {
            return Err(ModelError::shape(what, expected, self.modes.len()));
        }
        if self.mean.len() != self.field_dim {
            return Err(ModelError::shape("basis mean", self.field_dim, self.mean.len()));
        }
        let modes = DMatrix::from_row_slice(self.field_dim, self.latent_dim, &self.modes);
        ReducedBasis::new(modes, DVector::from_vec(self.mean))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> ModelResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| ModelError::ArtifactRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ModelError::ArtifactParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load the shared reduced basis.
pub fn load_basis(path: &Path) -> ModelResult<Arc<ReducedBasis>> {
    let artifact: BasisArtifact = read_json(path)?;
    let basis = artifact.into_basis()?;
    tracing::info!(
        path = %path.display(),
        field_dim = basis.field_dim(),
        latent_dim = basis.latent_dim(),
        "loaded reduced basis"
    );
    Ok(Arc::new(basis))
}

/// Load one trained model artifact.
pub fn load_model(path: &Path, basis: Option<&Arc<ReducedBasis>>) -> ModelResult<TrainedModel> {
    let artifact: ModelArtifact = read_json(path)?;
    let output = artifact.output;
    let model = artifact.into_model(basis)?;
    tracing::info!(
        path = %path.display(),
        name = model.name(),
        output = ?output,
        field_dim = model.field_dim(),
        "loaded model artifact"
    );
    Ok(model)
}
