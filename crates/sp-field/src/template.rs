//! Template parsing.

use crate::error::{FieldError, FieldResult};
use crate::layout::TemplateLayout;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Hex-encoded SHA-256 of raw template bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// One data-block row: the original column text plus parsed values.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    fields: Vec<String>,
    values: Vec<f64>,
    ending: String,
}

impl DataRow {
    fn parse(line: &str, column_count: usize) -> Result<Self, String> {
        let body = line.trim_end_matches(['\n', '\r']);
        let ending = line[body.len()..].to_string();

        let fields: Vec<String> = body.split_whitespace().map(str::to_string).collect();
        if fields.len() != column_count {
            return Err(format!(
                "expected {column_count} columns, found {}",
                fields.len()
            ));
        }
        let values = fields
            .iter()
            .map(|f| {
                f.parse::<f64>()
                    .map_err(|_| format!("'{f}' is not a number"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            fields,
            values,
            ending,
        })
    }

    /// Column text exactly as it appears in the template.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn value(&self, column: usize) -> Option<f64> {
        self.values.get(column).copied()
    }

    /// Line terminator of this row (`"\n"`, `"\r\n"`, or empty at end of file).
    pub fn ending(&self) -> &str {
        &self.ending
    }
}

/// A template file split into its three regions.
#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    layout: TemplateLayout,
    header: String,
    rows: Vec<DataRow>,
    footer: String,
    sha256: String,
}

impl Template {
    /// Read and split the template at `path`.
    pub fn load(path: &Path, layout: &TemplateLayout) -> FieldResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| FieldError::TemplateRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let sha256 = sha256_hex(&bytes);
        let content = String::from_utf8(bytes).map_err(|e| FieldError::TemplateRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        Self::parse(path, &content, layout, sha256)
    }

    /// Load and verify the content hash against a pinned version.
    pub fn load_pinned(
        path: &Path,
        layout: &TemplateLayout,
        expected_sha256: Option<&str>,
    ) -> FieldResult<Self> {
        let template = Self::load(path, layout)?;
        if let Some(expected) = expected_sha256
            && !expected.eq_ignore_ascii_case(&template.sha256)
        {
            return Err(FieldError::TemplateVersionMismatch {
                path: path.to_path_buf(),
                expected: expected.to_string(),
                actual: template.sha256,
            });
        }
        Ok(template)
    }

    fn parse(
        path: &Path,
        content: &str,
        layout: &TemplateLayout,
        sha256: String,
    ) -> FieldResult<Self> {
        layout.validate()?;
        let shape_err = |detail: String| FieldError::TemplateShapeMismatch {
            path: path.to_path_buf(),
            detail,
        };

        let lines: Vec<&str> = content.split_inclusive('\n').collect();
        let data_end = layout
            .header_lines
            .checked_add(layout.data_rows)
            .ok_or_else(|| FieldError::InvalidLayout {
                what: format!(
                    "header_lines {} + data_rows {} overflows",
                    layout.header_lines, layout.data_rows
                ),
            })?;
        if lines.len() < data_end {
            let available = lines.len().saturating_sub(layout.header_lines);
            return Err(shape_err(format!(
                "expected {} data rows after {} header lines, file has only {available}",
                layout.data_rows, layout.header_lines
            )));
        }

        let header = lines[..layout.header_lines].concat();
        let rows = lines[layout.header_lines..data_end]
            .iter()
            .enumerate()
            .map(|(i, line)| {
                DataRow::parse(line, layout.column_count())
                    .map_err(|msg| shape_err(format!("line {}: {msg}", layout.header_lines + i + 1)))
            })
            .collect::<FieldResult<Vec<_>>>()?;
        if let Some(next) = lines.get(data_end)
            && DataRow::parse(next, layout.column_count()).is_ok()
        {
            return Err(shape_err(format!(
                "data block continues past row {} (line {})",
                layout.data_rows,
                data_end + 1
            )));
        }
        let footer = lines[data_end..].concat();

        Ok(Self {
            path: path.to_path_buf(),
            layout: layout.clone(),
            header,
            rows,
            footer,
            sha256,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn layout(&self) -> &TemplateLayout {
        &self.layout
    }

    /// Header lines, including their terminators.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Everything after the data block, byte for byte.
    pub fn footer(&self) -> &str {
        &self.footer
    }

    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    /// All values of one named column.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let index = self.layout.column_index(name)?;
        Some(self.rows.iter().filter_map(|r| r.value(index)).collect())
    }
}
