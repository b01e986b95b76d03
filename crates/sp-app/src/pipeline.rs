//! Predict-and-write pipeline.

use crate::config::PipelineConfig;
use crate::error::{AppError, AppResult};
use sp_core::Timer;
use sp_field::FieldWriter;
use sp_model::artifact::{load_basis, load_model};
use sp_model::{FlightCondition, ModelVariant, Predictor, PressureField};
use std::path::{Path, PathBuf};

/// Fixed output file per variant.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub multi_fidelity: PathBuf,
    pub single_fidelity: PathBuf,
}

impl OutputPaths {
    pub fn get(&self, variant: ModelVariant) -> &Path {
        match variant {
            ModelVariant::MultiFidelity => &self.multi_fidelity,
            ModelVariant::SingleFidelity => &self.single_fidelity,
        }
    }
}

/// Result of one request.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub variant: ModelVariant,
    pub condition: FlightCondition,
    /// Pressure coefficients as predicted (before scaling to Pa).
    pub pressure_field: PressureField,
    pub output_path: PathBuf,
}

/// Loaded artifacts plus the writer. Immutable; share behind an `Arc`.
#[derive(Debug)]
pub struct Pipeline {
    predictor: Predictor,
    writer: FieldWriter,
    outputs: OutputPaths,
}

impl Pipeline {
    /// Assemble a pipeline from already-loaded parts.
    ///
    /// The template is parsed once here so layout drift is caught at startup;
    /// it is still re-read on every write.
    pub fn new(predictor: Predictor, writer: FieldWriter, outputs: OutputPaths) -> AppResult<Self> {
        if predictor.field_dim() != writer.field_dim() {
            return Err(AppError::FieldDimMismatch {
                predictor: predictor.field_dim(),
                template: writer.field_dim(),
            });
        }
        if outputs.multi_fidelity == outputs.single_fidelity {
            return Err(AppError::Config(
                "each model variant needs its own output file".to_string(),
            ));
        }
        let template = writer.load_template()?;
        tracing::info!(
            template = %template.path().display(),
            sha256 = template.sha256(),
            rows = template.row_count(),
            "validated template"
        );

        Ok(Self {
            predictor,
            writer,
            outputs,
        })
    }

    /// Load every artifact named by the configuration.
    pub fn from_config(config: &PipelineConfig) -> AppResult<Self> {
        let timer = Timer::start("load_artifacts");
        let basis = config.basis.as_deref().map(load_basis).transpose()?;
        let multi = load_model(&config.models.multi_fidelity, basis.as_ref())?;
        let single = load_model(&config.models.single_fidelity, basis.as_ref())?;
        let predictor = Predictor::new(multi, single, config.domain_policy)?;
        timer.stop_and_log();

        let writer = FieldWriter::new(&config.template.path, config.template.layout.clone())
            .with_expected_sha256(config.template.sha256.clone());
        let outputs = OutputPaths {
            multi_fidelity: config.output_path(ModelVariant::MultiFidelity),
            single_fidelity: config.output_path(ModelVariant::SingleFidelity),
        };
        Self::new(predictor, writer, outputs)
    }

    /// Load a pipeline file and everything it references.
    pub fn load(config_path: &Path) -> AppResult<Self> {
        let config = PipelineConfig::load(config_path)?;
        Self::from_config(&config)
    }

    pub fn predictor(&self) -> &Predictor {
        &self.predictor
    }

    pub fn writer(&self) -> &FieldWriter {
        &self.writer
    }

    pub fn field_dim(&self) -> usize {
        self.predictor.field_dim()
    }

    pub fn output_path(&self, variant: ModelVariant) -> &Path {
        self.outputs.get(variant)
    }

    /// Predict the field for `condition` and write it to the variant's file.
    pub fn predict_and_write(
        &self,
        variant: ModelVariant,
        condition: FlightCondition,
    ) -> AppResult<Prediction> {
        let timer = Timer::start("predict");
        let pressure_field = self.predictor.predict(variant, &condition)?;
        timer.stop_and_log();

        let output_path = self
            .writer
            .write(pressure_field.values(), self.outputs.get(variant))?;

        tracing::info!(
            variant = variant.as_str(),
            mach = condition.mach,
            alpha = condition.alpha,
            beta = condition.beta,
            output = %output_path.display(),
            "prediction written"
        );
        Ok(Prediction {
            variant,
            condition,
            pressure_field,
            output_path,
        })
    }

    /// Same as `predict_and_write`, with the variant given by its external name.
    pub fn predict_and_write_named(
        &self,
        variant: &str,
        mach: f64,
        alpha: f64,
        beta: f64,
    ) -> AppResult<Prediction> {
        let variant = ModelVariant::parse(variant)?;
        self.predict_and_write(variant, FlightCondition::new(mach, alpha, beta))
    }
}
