//! Variant selection, normalization, regression and decoding.

use crate::basis::ReducedBasis;
use crate::condition::{DomainPolicy, FlightCondition, TrainingDomain};
use crate::error::{ModelError, ModelResult};
use crate::regressor::{Regressor, TargetScaler};
use crate::variant::ModelVariant;
use nalgebra::DVector;
use std::sync::Arc;

/// Dense per-point pressure coefficients, one entry per template data row.
#[derive(Debug, Clone, PartialEq)]
pub struct PressureField(Vec<f64>);

impl PressureField {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// `(min, max)` of the field, `None` when empty.
    pub fn range(&self) -> Option<(f64, f64)> {
        sp_core::min_max(&self.0)
    }
}

impl AsRef<[f64]> for PressureField {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// How regressor outputs become a full field. Fixed per artifact at load time.
#[derive(Debug, Clone)]
pub enum Decoder {
    /// The regressor already emits `field_dim` values.
    Identity { field_dim: usize },
    /// The regressor emits latent POD coefficients.
    Basis(Arc<ReducedBasis>),
}

impl Decoder {
    pub fn field_dim(&self) -> usize {
        match self {
            Decoder::Identity { field_dim } => *field_dim,
            Decoder::Basis(basis) => basis.field_dim(),
        }
    }

    /// Length the decoder expects from the regressor.
    pub fn input_dim(&self) -> usize {
        match self {
            Decoder::Identity { field_dim } => *field_dim,
            Decoder::Basis(basis) => basis.latent_dim(),
        }
    }

    pub fn decode(&self, raw: DVector<f64>) -> ModelResult<DVector<f64>> {
        match self {
            Decoder::Identity { .. } => Ok(raw),
            Decoder::Basis(basis) => basis.reconstruct(&raw),
        }
    }

    pub fn is_latent(&self) -> bool {
        matches!(self, Decoder::Basis(_))
    }
}

/// One loaded, immutable model artifact.
#[derive(Debug)]
pub struct TrainedModel {
    name: String,
    domain: TrainingDomain,
    regressor: Box<dyn Regressor>,
    target_scaler: Option<TargetScaler>,
    decoder: Decoder,
}

impl TrainedModel {
    pub fn new(
        name: impl Into<String>,
        domain: TrainingDomain,
        regressor: Box<dyn Regressor>,
        target_scaler: Option<TargetScaler>,
        decoder: Decoder,
    ) -> ModelResult<Self> {
        let name = name.into();
        domain.validate()?;

        let output_dim = regressor.output_dim();
        if let Some(scaler) = &target_scaler
            && scaler.len() != output_dim
        {
            return Err(ModelError::shape(
                format!("target scaler of model '{name}'"),
                output_dim,
                scaler.len(),
            ));
        }
        if decoder.input_dim() != output_dim {
            let what = if decoder.is_latent() {
                format!("latent output of model '{name}' vs basis")
            } else {
                format!("field output of model '{name}'")
            };
            return Err(ModelError::shape(what, decoder.input_dim(), output_dim));
        }

        Ok(Self {
            name,
            domain,
            regressor,
            target_scaler,
            decoder,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &TrainingDomain {
        &self.domain
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    pub fn field_dim(&self) -> usize {
        self.decoder.field_dim()
    }

    /// Evaluate at an already-normalized input.
    pub fn predict_normalized(&self, x: &[f64; 3]) -> ModelResult<PressureField> {
        let mut raw = self.regressor.predict(x);
        if let Some(scaler) = &self.target_scaler {
            raw = scaler.inverse_transform(&raw);
        }
        if raw.len() != self.decoder.input_dim() {
            return Err(ModelError::shape(
                format!("regressor output of model '{}'", self.name),
                self.decoder.input_dim(),
                raw.len(),
            ));
        }

        let field = self.decoder.decode(raw)?;
        if field.len() != self.field_dim() {
            return Err(ModelError::shape(
                format!("decoded field of model '{}'", self.name),
                self.field_dim(),
                field.len(),
            ));
        }
        Ok(PressureField::new(field.as_slice().to_vec()))
    }
}

/// Holds both trained variants and evaluates requests against them.
///
/// Immutable after construction; share it across threads behind an `Arc`.
#[derive(Debug)]
pub struct Predictor {
    multi_fidelity: TrainedModel,
    single_fidelity: TrainedModel,
    policy: DomainPolicy,
}

impl Predictor {
    pub fn new(
        multi_fidelity: TrainedModel,
        single_fidelity: TrainedModel,
        policy: DomainPolicy,
    ) -> ModelResult<Self> {
        if multi_fidelity.field_dim() != single_fidelity.field_dim() {
            return Err(ModelError::shape(
                "single-fidelity field length vs multi-fidelity",
                multi_fidelity.field_dim(),
                single_fidelity.field_dim(),
            ));
        }
        Ok(Self {
            multi_fidelity,
            single_fidelity,
            policy,
        })
    }

    pub fn field_dim(&self) -> usize {
        self.multi_fidelity.field_dim()
    }

    pub fn policy(&self) -> DomainPolicy {
        self.policy
    }

    pub fn model(&self, variant: ModelVariant) -> &TrainedModel {
        match variant {
            ModelVariant::MultiFidelity => &self.multi_fidelity,
            ModelVariant::SingleFidelity => &self.single_fidelity,
        }
    }

    /// Predict the pressure-coefficient field for one flight condition.
    pub fn predict(
        &self,
        variant: ModelVariant,
        condition: &FlightCondition,
    ) -> ModelResult<PressureField> {
        let model = self.model(variant);
        let resolved = self.policy.apply(model.domain(), condition)?;
        let x = model.domain().normalize(&resolved);
        tracing::debug!(
            variant = variant.as_str(),
            model = model.name(),
            x0 = x[0],
            x1 = x[1],
            x2 = x[2],
            "normalized flight condition"
        );
        model.predict_normalized(&x)
    }

    /// Same as `predict`, with the variant given by its external name.
    pub fn predict_named(
        &self,
        variant: &str,
        mach: f64,
        alpha: f64,
        beta: f64,
    ) -> ModelResult<PressureField> {
        let variant = ModelVariant::parse(variant)?;
        self.predict(variant, &FlightCondition::new(mach, alpha, beta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;
    use std::sync::Mutex;

    /// Returns a fixed vector and records the inputs it saw.
    #[derive(Debug)]
    struct Recording {
        output: Vec<f64>,
        seen: Mutex<Vec<[f64; 3]>>,
    }

    impl Recording {
        fn new(output: Vec<f64>) -> Self {
            Self {
                output,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Regressor for Recording {
        fn output_dim(&self) -> usize {
            self.output.len()
        }

        fn predict(&self, x: &[f64; 3]) -> DVector<f64> {
            self.seen.lock().unwrap().push(*x);
            DVector::from_vec(self.output.clone())
        }
    }

    /// Claims one output length but returns another.
    #[derive(Debug)]
    struct Lying;

    impl Regressor for Lying {
        fn output_dim(&self) -> usize {
            3
        }

        fn predict(&self, _x: &[f64; 3]) -> DVector<f64> {
            DVector::zeros(2)
        }
    }

    fn basis() -> Arc<ReducedBasis> {
        let modes = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, -1.0]);
        let mean = DVector::from_vec(vec![0.0, 0.0, 0.5, 1.0]);
        Arc::new(ReducedBasis::new(modes, mean).unwrap())
    }

    fn latent_model(name: &str, latent: Vec<f64>) -> TrainedModel {
        TrainedModel::new(
            name,
            TrainingDomain::HYPERSONIC,
            Box::new(Recording::new(latent)),
            None,
            Decoder::Basis(basis()),
        )
        .unwrap()
    }

    #[test]
    fn identity_decoder_returns_raw_output() {
        let raw = vec![0.1, -0.2, 0.3, 0.4];
        let model = TrainedModel::new(
            "field",
            TrainingDomain::HYPERSONIC,
            Box::new(Recording::new(raw.clone())),
            None,
            Decoder::Identity { field_dim: 4 },
        )
        .unwrap();
        let field = model.predict_normalized(&[0.5, 0.5, 0.5]).unwrap();
        assert_eq!(field.values(), raw.as_slice());
    }

    #[test]
    fn latent_decoder_expands_through_basis() {
        let model = latent_model("mf", vec![2.0, 3.0]);
        let field = model.predict_normalized(&[0.0, 0.0, 0.0]).unwrap();
        assert_eq!(field.values(), &[2.0, 3.0, 5.5, 2.0]);
    }

    #[test]
    fn predictor_normalizes_before_calling_model() {
        let regressor = Arc::new(Recording::new(vec![0.0, 0.0]));
        #[derive(Debug)]
        struct Shared(Arc<Recording>);
        impl Regressor for Shared {
            fn output_dim(&self) -> usize {
                self.0.output_dim()
            }
            fn predict(&self, x: &[f64; 3]) -> DVector<f64> {
                self.0.predict(x)
            }
        }

        let mf = TrainedModel::new(
            "mf",
            TrainingDomain::HYPERSONIC,
            Box::new(Shared(regressor.clone())),
            None,
            Decoder::Basis(basis()),
        )
        .unwrap();
        let sf = latent_model("sf", vec![0.0, 0.0]);
        let predictor = Predictor::new(mf, sf, DomainPolicy::default()).unwrap();

        predictor
            .predict(
                ModelVariant::MultiFidelity,
                &FlightCondition::new(6.0, 4.0, 4.0),
            )
            .unwrap();
        assert_eq!(regressor.seen.lock().unwrap().as_slice(), &[[0.5, 0.5, 0.5]]);
    }

    #[test]
    fn variants_route_to_their_own_model() {
        let predictor = Predictor::new(
            latent_model("mf", vec![1.0, 0.0]),
            latent_model("sf", vec![0.0, 1.0]),
            DomainPolicy::Extrapolate,
        )
        .unwrap();
        let c = FlightCondition::new(5.0, 0.0, 0.0);
        let mf = predictor.predict(ModelVariant::MultiFidelity, &c).unwrap();
        let sf = predictor.predict(ModelVariant::SingleFidelity, &c).unwrap();
        assert_ne!(mf, sf);
        assert_eq!(predictor.model(ModelVariant::SingleFidelity).name(), "sf");
        assert_eq!(predictor.field_dim(), 4);
    }

    #[test]
    fn predict_named_rejects_unknown_variant() {
        let predictor = Predictor::new(
            latent_model("mf", vec![1.0, 0.0]),
            latent_model("sf", vec![0.0, 1.0]),
            DomainPolicy::Extrapolate,
        )
        .unwrap();
        let err = predictor.predict_named("medium-fidelity", 6.0, 4.0, 4.0).unwrap_err();
        assert!(matches!(err, ModelError::InvalidVariant { .. }));
        assert!(predictor.predict_named("single-fidelity", 6.0, 4.0, 4.0).is_ok());
    }

    #[test]
    fn load_time_shape_mismatch_between_model_and_basis() {
        let err = TrainedModel::new(
            "bad",
            TrainingDomain::HYPERSONIC,
            Box::new(Recording::new(vec![0.0; 3])),
            None,
            Decoder::Basis(basis()),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ModelError::ShapeMismatch {
                expected: 2,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn runtime_shape_mismatch_aborts() {
        let model = TrainedModel::new(
            "liar",
            TrainingDomain::HYPERSONIC,
            Box::new(Lying),
            None,
            Decoder::Identity { field_dim: 3 },
        )
        .unwrap();
        let err = model.predict_normalized(&[0.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::ShapeMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn variants_must_agree_on_field_dim() {
        let field_model = TrainedModel::new(
            "sf",
            TrainingDomain::HYPERSONIC,
            Box::new(Recording::new(vec![0.0; 5])),
            None,
            Decoder::Identity { field_dim: 5 },
        )
        .unwrap();
        let err = Predictor::new(
            latent_model("mf", vec![0.0, 0.0]),
            field_model,
            DomainPolicy::Extrapolate,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch { .. }));
    }

    #[test]
    fn target_scaler_applied_before_decoding() {
        let scaler = TargetScaler::new(
            DVector::from_vec(vec![1.0, 1.0]),
            DVector::from_vec(vec![2.0, 2.0]),
        )
        .unwrap();
        let model = TrainedModel::new(
            "scaled",
            TrainingDomain::HYPERSONIC,
            Box::new(Recording::new(vec![0.5, 0.0])),
            Some(scaler),
            Decoder::Basis(basis()),
        )
        .unwrap();
        // latent = [2.0, 1.0]
        let field = model.predict_normalized(&[0.0; 3]).unwrap();
        assert_eq!(field.values(), &[2.0, 1.0, 3.5, 4.0]);
    }

    #[test]
    fn pressure_field_range() {
        assert_eq!(PressureField::new(vec![]).range(), None);
        let f = PressureField::new(vec![0.5, -1.0, 2.0]);
        assert_eq!(f.range(), Some((-1.0, 2.0)));
    }
}
