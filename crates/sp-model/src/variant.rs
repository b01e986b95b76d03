//! Model variant selector.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which trained artifact serves a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelVariant {
    MultiFidelity,
    SingleFidelity,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 2] = [ModelVariant::MultiFidelity, ModelVariant::SingleFidelity];

    /// External selector name used by requests and the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelVariant::MultiFidelity => "multi-fidelity",
            ModelVariant::SingleFidelity => "single-fidelity",
        }
    }

    pub fn parse(name: &str) -> ModelResult<Self> {
        match name {
            "multi-fidelity" => Ok(ModelVariant::MultiFidelity),
            "single-fidelity" => Ok(ModelVariant::SingleFidelity),
            other => Err(ModelError::InvalidVariant {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
