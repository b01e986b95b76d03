//! POD reduced basis.

use crate::error::{ModelError, ModelResult};
use nalgebra::{DMatrix, DVector};

/// Linear map from latent coefficients to the full surface field.
///
/// `modes` is `field_dim × latent_dim` (one POD mode per column), so that
/// `field = modes · latent + mean`, which is `latent · Uᵀ + mean` for the
/// row-per-mode matrix `U` produced at training time.
#[derive(Debug, Clone)]
pub struct ReducedBasis {
    modes: DMatrix<f64>,
    mean: DVector<f64>,
}

impl ReducedBasis {
    pub fn new(modes: DMatrix<f64>, mean: DVector<f64>) -> ModelResult<Self> {
        if mean.len() != modes.nrows() {
            return Err(ModelError::shape(
                "basis mean vector",
                modes.nrows(),
                mean.len(),
            ));
        }
        if modes.ncols() == 0 {
            return Err(ModelError::invalid("basis", "latent dimension is zero"));
        }
        Ok(Self { modes, mean })
    }

    pub fn field_dim(&self) -> usize {
        self.modes.nrows()
    }

    pub fn latent_dim(&self) -> usize {
        self.modes.ncols()
    }

    pub fn mean(&self) -> &DVector<f64> {
        &self.mean
    }

    /// Dense reconstruction of the full field from latent coefficients.
    pub fn reconstruct(&self, latent: &DVector<f64>) -> ModelResult<DVector<f64>> {
        if latent.len() != self.latent_dim() {
            return Err(ModelError::shape(
                "latent coefficient vector",
                self.latent_dim(),
                latent.len(),
            ));
        }
        Ok(&self.modes * latent + &self.mean)
    }
}
