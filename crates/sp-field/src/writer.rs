//! Field writer: rescale a pressure-coefficient field and splice it into the
//! template.

use crate::error::{FieldError, FieldResult};
use crate::layout::TemplateLayout;
use crate::template::Template;
use sp_core::{Timer, constants, ensure_all_finite};
use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use uom::si::pressure::pascal;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Shortest text that round-trips the value; exponent form for very large or
/// small magnitudes.
pub fn format_value(v: f64) -> String {
    format!("{v:?}")
}

/// Writes predicted fields into copies of one template.
#[derive(Debug, Clone)]
pub struct FieldWriter {
    template_path: PathBuf,
    layout: TemplateLayout,
    expected_sha256: Option<String>,
}

impl FieldWriter {
    pub fn new(template_path: impl Into<PathBuf>, layout: TemplateLayout) -> Self {
        Self {
            template_path: template_path.into(),
            layout,
            expected_sha256: None,
        }
    }

    /// Pin the template version; every load is checked against it.
    pub fn with_expected_sha256(mut self, sha256: Option<String>) -> Self {
        self.expected_sha256 = sha256;
        self
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    pub fn layout(&self) -> &TemplateLayout {
        &self.layout
    }

    /// Number of values a field must have.
    pub fn field_dim(&self) -> usize {
        self.layout.data_rows
    }

    pub fn load_template(&self) -> FieldResult<Template> {
        Template::load_pinned(
            &self.template_path,
            &self.layout,
            self.expected_sha256.as_deref(),
        )
    }

    /// Write `field` (pressure coefficients) to `output_path`, scaled to Pa.
    ///
    /// The template is re-read on every call. Either the whole output file is
    /// produced or the previous content at `output_path` is left untouched.
    pub fn write(&self, field: &[f64], output_path: &Path) -> FieldResult<PathBuf> {
        if field.len() != self.field_dim() {
            return Err(FieldError::FieldLengthMismatch {
                expected: self.field_dim(),
                actual: field.len(),
            });
        }
        ensure_all_finite(field, "pressure coefficient")?;

        let timer = Timer::start("write_field");
        let template = self.load_template()?;
        if template.row_count() != field.len() {
            return Err(FieldError::TemplateShapeMismatch {
                path: self.template_path.clone(),
                detail: format!(
                    "template has {} data rows, field has {} values",
                    template.row_count(),
                    field.len()
                ),
            });
        }

        let q_inf = constants::dynamic_pressure().get::<pascal>();
        let content = render(&template, field, q_inf)?;
        write_atomic(output_path, content.as_bytes())?;
        timer.stop_and_log();

        tracing::info!(
            path = %output_path.display(),
            rows = field.len(),
            q_inf_pa = q_inf,
            "wrote pressure field"
        );
        Ok(output_path.to_path_buf())
    }
}

/// Header, rewritten data block, footer.
fn render(template: &Template, field: &[f64], q_inf: f64) -> FieldResult<String> {
    let pressure = template.layout().pressure_index()?;
    let mut out = String::with_capacity(
        template.header().len() + template.footer().len() + template.row_count() * 96,
    );

    out.push_str(template.header());
    for (row, &cp) in template.rows().iter().zip(field) {
        for (i, text) in row.fields().iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            if i == pressure {
                out.push_str(&format_value(cp * q_inf));
            } else {
                out.push_str(text);
            }
        }
        out.push_str(row.ending());
    }
    out.push_str(template.footer());
    Ok(out)
}

/// Write to a sibling temporary file, then rename over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> FieldResult<()> {
    let io_err = |source: std::io::Error| FieldError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(io_err)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            io_err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "output path has no file name",
            ))
        })?;
    let tmp_path = parent.join(format!(
        ".{file_name}.{}.{}.tmp",
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    let result = (|| -> std::io::Result<()> {
        let mut file = File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp_path, path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_err(e));
    }
    Ok(())
}
