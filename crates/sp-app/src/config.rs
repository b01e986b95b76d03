//! Pipeline configuration (YAML).
//!
//! ```yaml
//! models:
//!   multi_fidelity: models/MF_model.json
//!   single_fidelity: models/SF_model.json
//! basis: models/pod_basis.json
//! template:
//!   path: render_data/template.dat
//!   layout:
//!     header_lines: 12
//!     data_rows: 55966
//! output:
//!   dir: render_data
//! domain_policy: extrapolate
//! ```
//!
//! Relative paths are resolved against the directory of the pipeline file.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use sp_field::TemplateLayout;
use sp_model::{DomainPolicy, ModelVariant};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPaths {
    pub multi_fidelity: PathBuf,
    pub single_fidelity: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub layout: TemplateLayout,
    /// Pinned template version (hex SHA-256).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
    #[serde(default = "default_mf_file")]
    pub multi_fidelity: String,
    #[serde(default = "default_sf_file")]
    pub single_fidelity: String,
}

fn default_mf_file() -> String {
    "MF_prediction.dat".to_string()
}

fn default_sf_file() -> String {
    "SF_prediction.dat".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub models: ModelPaths,
    /// Shared POD basis; required when any model emits latent coefficients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis: Option<PathBuf>,
    pub template: TemplateConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub domain_policy: DomainPolicy,
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

impl PipelineConfig {
    pub fn from_yaml_str(content: &str, path: &Path) -> AppResult<Self> {
        serde_yaml::from_str(content).map_err(|e| AppError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load a pipeline file and resolve its relative paths.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigFileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_yaml_str(&content, path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let config = config.resolved(base);
        config.validate()?;
        Ok(config)
    }

    /// Rebase every relative path onto `base`.
    pub fn resolved(mut self, base: &Path) -> Self {
        self.models.multi_fidelity = resolve(base, &self.models.multi_fidelity);
        self.models.single_fidelity = resolve(base, &self.models.single_fidelity);
        self.basis = self.basis.map(|b| resolve(base, &b));
        self.template.path = resolve(base, &self.template.path);
        self.output.dir = resolve(base, &self.output.dir);
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        for (variant, name) in [
            (ModelVariant::MultiFidelity, &self.output.multi_fidelity),
            (ModelVariant::SingleFidelity, &self.output.single_fidelity),
        ] {
            let file = Path::new(name);
            if name.is_empty() || file.file_name().map(|f| f != file.as_os_str()).unwrap_or(true) {
                return Err(AppError::Config(format!(
                    "output file for {variant} must be a plain file name, got '{name}'"
                )));
            }
        }
        if self.output.multi_fidelity == self.output.single_fidelity {
            return Err(AppError::Config(
                "each model variant needs its own output file".to_string(),
            ));
        }
        self.template.layout.validate()?;
        Ok(())
    }

    pub fn output_path(&self, variant: ModelVariant) -> PathBuf {
        let name = match variant {
            ModelVariant::MultiFidelity => &self.output.multi_fidelity,
            ModelVariant::SingleFidelity => &self.output.single_fidelity,
        };
        self.output.dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
models:
  multi_fidelity: models/MF_model.json
  single_fidelity: /opt/models/SF_model.json
basis: models/pod_basis.json
template:
  path: render_data/template.dat
  layout:
    header_lines: 12
    data_rows: 100
output:
  dir: render_data
domain_policy: clamp
"#;

    #[test]
    fn parse_and_resolve() {
        let config = PipelineConfig::from_yaml_str(YAML, Path::new("pipeline.yaml"))
            .unwrap()
            .resolved(Path::new("/srv/app"));
        config.validate().unwrap();

        assert_eq!(
            config.models.multi_fidelity,
            PathBuf::from("/srv/app/models/MF_model.json")
        );
        assert_eq!(
            config.models.single_fidelity,
            PathBuf::from("/opt/models/SF_model.json")
        );
        assert_eq!(config.template.layout.data_rows, 100);
        assert_eq!(config.template.layout.column_count(), 9);
        assert_eq!(config.domain_policy, DomainPolicy::Clamp);
        assert_eq!(
            config.output_path(ModelVariant::SingleFidelity),
            PathBuf::from("/srv/app/render_data/SF_prediction.dat")
        );
    }

    #[test]
    fn layout_and_policy_default() {
        let yaml = r#"
models: { multi_fidelity: a.json, single_fidelity: b.json }
template: { path: t.dat }
output: { dir: out }
"#;
        let config = PipelineConfig::from_yaml_str(yaml, Path::new("p.yaml")).unwrap();
        assert_eq!(config.template.layout, TemplateLayout::default());
        assert_eq!(config.domain_policy, DomainPolicy::Extrapolate);
        assert!(config.basis.is_none());
    }

    #[test]
    fn shared_output_file_rejected() {
        let yaml = r#"
models: { multi_fidelity: a.json, single_fidelity: b.json }
template: { path: t.dat }
output: { dir: out, multi_fidelity: same.dat, single_fidelity: same.dat }
"#;
        let config = PipelineConfig::from_yaml_str(yaml, Path::new("p.yaml")).unwrap();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn nested_output_file_rejected() {
        let yaml = r#"
models: { multi_fidelity: a.json, single_fidelity: b.json }
template: { path: t.dat }
output: { dir: out, multi_fidelity: ../escape.dat }
"#;
        let config = PipelineConfig::from_yaml_str(yaml, Path::new("p.yaml")).unwrap();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = PipelineConfig::from_yaml_str("models: [", Path::new("p.yaml")).unwrap_err();
        assert!(matches!(err, AppError::ConfigParse { .. }));
    }
}
