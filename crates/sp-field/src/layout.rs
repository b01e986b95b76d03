//! Schema descriptor for the deployed template.

use crate::error::{FieldError, FieldResult};
use serde::{Deserialize, Serialize};

/// Header line count of the deployed surface template.
pub const DEFAULT_HEADER_LINES: usize = 12;
/// Surface point count of the deployed surface template.
pub const DEFAULT_DATA_ROWS: usize = 55_966;

pub const DEFAULT_COLUMNS: [&str; 9] = ["x", "y", "z", "Cp", "Rho", "U", "V", "W", "Pressure"];

/// Fixed positions of the template regions.
///
/// Checked against the actual file every time it is loaded; any drift is a
/// `TemplateShapeMismatch` rather than a silent misalignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateLayout {
    /// Lines before the data block.
    pub header_lines: usize,
    /// Rows in the data block; equals the predicted field length.
    pub data_rows: usize,
    /// Column names of a data row, in file order.
    pub columns: Vec<String>,
    /// Name of the column that receives the predicted pressure.
    pub pressure_column: String,
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self {
            header_lines: DEFAULT_HEADER_LINES,
            data_rows: DEFAULT_DATA_ROWS,
            columns: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            pressure_column: "Pressure".to_string(),
        }
    }
}

impl TemplateLayout {
    /// Default column set with custom region sizes.
    pub fn with_sizes(header_lines: usize, data_rows: usize) -> Self {
        Self {
            header_lines,
            data_rows,
            ..Self::default()
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn pressure_index(&self) -> FieldResult<usize> {
        self.column_index(&self.pressure_column)
            .ok_or_else(|| FieldError::InvalidLayout {
                what: format!(
                    "pressure column '{}' is not one of {:?}",
                    self.pressure_column, self.columns
                ),
            })
    }

    pub fn validate(&self) -> FieldResult<()> {
        if self.data_rows == 0 {
            return Err(FieldError::InvalidLayout {
                what: "data block must have at least one row".to_string(),
            });
        }
        if self.columns.is_empty() {
            return Err(FieldError::InvalidLayout {
                what: "no columns declared".to_string(),
            });
        }
        self.pressure_index()?;
        Ok(())
    }
}
