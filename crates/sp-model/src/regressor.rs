//! Trained regressors mapping a normalized flight condition to model outputs.
//!
//! Inputs are always the three normalized parameters `(mach, alpha, beta)`.
//! Outputs are either latent POD coefficients or full-field values; the
//! regressor itself does not know which (see `Decoder`).

use crate::error::{ModelError, ModelResult};
use nalgebra::{DMatrix, DVector};
use std::fmt::Debug;

/// Number of model inputs.
pub const INPUT_DIM: usize = 3;

/// A trained, immutable regression model.
///
/// Implementations must be deterministic: identical inputs give bit-identical
/// outputs.
pub trait Regressor: Debug + Send + Sync {
    /// Length of the vector returned by `predict`.
    fn output_dim(&self) -> usize;

    /// Evaluate at a normalized input.
    fn predict(&self, x: &[f64; INPUT_DIM]) -> DVector<f64>;
}

/// Exponents of each monomial, in graded lexicographic order.
///
/// For three inputs and degree 2 this yields
/// `1, x0, x1, x2, x0², x0·x1, x0·x2, x1², x1·x2, x2²`.
fn monomial_terms(degree: u32, include_bias: bool) -> Vec<Vec<usize>> {
    fn extend(start: usize, remaining: u32, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if remaining == 0 {
            out.push(current.clone());
            return;
        }
        for i in start..INPUT_DIM {
            current.push(i);
            extend(i, remaining - 1, current, out);
            current.pop();
        }
    }

    let mut terms = Vec::new();
    let first = if include_bias { 0 } else { 1 };
    for d in first..=degree {
        extend(0, d, &mut Vec::with_capacity(d as usize), &mut terms);
    }
    terms
}

/// Linear model on polynomial features of the normalized inputs.
#[derive(Debug, Clone)]
pub struct PolynomialRegressor {
    degree: u32,
    terms: Vec<Vec<usize>>,
    /// n_outputs × n_features
    coefficients: DMatrix<f64>,
    intercept: DVector<f64>,
}

impl PolynomialRegressor {
    pub fn new(
        degree: u32,
        include_bias: bool,
        coefficients: DMatrix<f64>,
        intercept: DVector<f64>,
    ) -> ModelResult<Self> {
        let terms = monomial_terms(degree, include_bias);
        if terms.is_empty() {
            return Err(ModelError::invalid(
                "polynomial regressor",
                "degree 0 without bias has no features",
            ));
        }
        if coefficients.ncols() != terms.len() {
            return Err(ModelError::shape(
                format!("polynomial coefficients (degree {degree}) feature count"),
                terms.len(),
                coefficients.ncols(),
            ));
        }
        if intercept.len() != coefficients.nrows() {
            return Err(ModelError::shape(
                "polynomial intercept",
                coefficients.nrows(),
                intercept.len(),
            ));
        }
        Ok(Self {
            degree,
            terms,
            coefficients,
            intercept,
        })
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    pub fn feature_count(&self) -> usize {
        self.terms.len()
    }

    pub fn features(&self, x: &[f64; INPUT_DIM]) -> DVector<f64> {
        DVector::from_iterator(
            self.terms.len(),
            self.terms
                .iter()
                .map(|term| term.iter().map(|&i| x[i]).product::<f64>()),
        )
    }
}

impl Regressor for PolynomialRegressor {
    fn output_dim(&self) -> usize {
        self.coefficients.nrows()
    }

    fn predict(&self, x: &[f64; INPUT_DIM]) -> DVector<f64> {
        &self.coefficients * self.features(x) + &self.intercept
    }
}

/// Gaussian-process posterior mean with a squared-exponential kernel.
///
/// `y(x) = Σᵢ amplitude · exp(-½ ‖(x - xᵢ) / ℓ‖²) · dual_coefᵢ`
#[derive(Debug, Clone)]
pub struct GaussianProcessRegressor {
    /// n_train × 3
    train_inputs: DMatrix<f64>,
    /// n_train × n_outputs
    dual_coef: DMatrix<f64>,
    length_scale: [f64; INPUT_DIM],
    amplitude: f64,
}

impl GaussianProcessRegressor {
    /// `length_scale` holds either one isotropic value or one per input.
    pub fn new(
        train_inputs: DMatrix<f64>,
        dual_coef: DMatrix<f64>,
        length_scale: &[f64],
        amplitude: f64,
    ) -> ModelResult<Self> {
        if train_inputs.ncols() != INPUT_DIM {
            return Err(ModelError::shape(
                "gaussian process training input width",
                INPUT_DIM,
                train_inputs.ncols(),
            ));
        }
        if train_inputs.nrows() == 0 {
            return Err(ModelError::invalid(
                "gaussian process",
                "no training points",
            ));
        }
        if dual_coef.nrows() != train_inputs.nrows() {
            return Err(ModelError::shape(
                "gaussian process dual coefficients",
                train_inputs.nrows(),
                dual_coef.nrows(),
            ));
        }
        let length_scale = match *length_scale {
            [l] => [l; INPUT_DIM],
            [a, b, c] => [a, b, c],
            _ => {
                return Err(ModelError::shape(
                    "gaussian process length scale",
                    INPUT_DIM,
                    length_scale.len(),
                ));
            }
        };
        if length_scale.iter().any(|l| !(l.is_finite() && *l > 0.0)) {
            return Err(ModelError::invalid(
                "gaussian process",
                "length scales must be positive and finite",
            ));
        }
        if !amplitude.is_finite() {
            return Err(ModelError::invalid(
                "gaussian process",
                "amplitude must be finite",
            ));
        }
        Ok(Self {
            train_inputs,
            dual_coef,
            length_scale,
            amplitude,
        })
    }

    pub fn training_points(&self) -> usize {
        self.train_inputs.nrows()
    }

    fn kernel_row(&self, x: &[f64; INPUT_DIM]) -> DVector<f64> {
        DVector::from_iterator(
            self.train_inputs.nrows(),
            self.train_inputs.row_iter().map(|xi| {
                let sq: f64 = (0..INPUT_DIM)
                    .map(|j| {
                        let d = (x[j] - xi[j]) / self.length_scale[j];
                        d * d
                    })
                    .sum();
                self.amplitude * (-0.5 * sq).exp()
            }),
        )
    }
}

impl Regressor for GaussianProcessRegressor {
    fn output_dim(&self) -> usize {
        self.dual_coef.ncols()
    }

    fn predict(&self, x: &[f64; INPUT_DIM]) -> DVector<f64> {
        self.dual_coef.tr_mul(&self.kernel_row(x))
    }
}

/// Inverse of the target standardization applied during training.
#[derive(Debug, Clone)]
pub struct TargetScaler {
    mean: DVector<f64>,
    scale: DVector<f64>,
}

impl TargetScaler {
    pub fn new(mean: DVector<f64>, scale: DVector<f64>) -> ModelResult<Self> {
        if mean.len() != scale.len() {
            return Err(ModelError::shape("target scaler scale", mean.len(), scale.len()));
        }
        Ok(Self { mean, scale })
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// `y = y_raw · scale + mean`
    pub fn inverse_transform(&self, raw: &DVector<f64>) -> DVector<f64> {
        raw.component_mul(&self.scale) + &self.mean
    }
}
