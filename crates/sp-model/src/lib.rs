//! sp-model: reduced-order surface pressure prediction.
//!
//! Provides:
//! - Flight conditions and the training domain the models were fit on
//! - Model variants (multi-fidelity, single-fidelity)
//! - Regressors (polynomial, Gaussian process) behind the `Regressor` trait
//! - POD reduced basis and the latent-to-field decoder
//! - `Predictor`, which ties the pieces into `predict(variant, condition)`
//!
//! # Architecture
//!
//! Artifacts are plain JSON files loaded once at startup into immutable
//! objects. The predictor owns the two trained models; both share a single
//! `Arc<ReducedBasis>` when they emit latent coefficients. Whether a model
//! emits latent coefficients or the full field is decided when the artifact
//! is loaded, so prediction itself is a straight-line computation.
//!
//! # Example
//!
//! ```no_run
//! use sp_model::{DomainPolicy, FlightCondition, ModelVariant, Predictor, artifact};
//! use std::path::Path;
//!
//! let basis = artifact::load_basis(Path::new("models/pod_basis.json")).unwrap();
//! let mf = artifact::load_model(Path::new("models/MF_model.json"), Some(&basis)).unwrap();
//! let sf = artifact::load_model(Path::new("models/SF_model.json"), Some(&basis)).unwrap();
//! let predictor = Predictor::new(mf, sf, DomainPolicy::default()).unwrap();
//!
//! let field = predictor
//!     .predict(ModelVariant::MultiFidelity, &FlightCondition::new(6.0, 4.0, 4.0))
//!     .unwrap();
//! println!("{} surface points", field.len());
//! ```

pub mod artifact;
pub mod basis;
pub mod condition;
pub mod error;
pub mod predictor;
pub mod regressor;
pub mod variant;

pub use basis::ReducedBasis;
pub use condition::{Bounds, DomainPolicy, FlightCondition, TrainingDomain};
pub use error::{ModelError, ModelResult};
pub use predictor::{Decoder, Predictor, PressureField, TrainedModel};
pub use regressor::{GaussianProcessRegressor, PolynomialRegressor, Regressor, TargetScaler};
pub use variant::ModelVariant;
