//! Partially specified configuration
//!
//! Both the command line and the JSON config file produce one of these; field
//! names match the flag names. Unknown keys in the file are rejected.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{VerifyError, VerifyResult};

/// One configuration layer. `None` means "not set at this layer".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub open: Option<PathBuf>,
    #[serde(default)]
    pub bs: Option<u64>,
    #[serde(default)]
    pub start: Option<u64>,
    #[serde(default)]
    pub checkonly: Option<bool>,
}

impl PartialConfig {
    /// Load a layer from a JSON file
    pub fn load(path: &Path) -> VerifyResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            VerifyError::Config(format!(
                "failed to read config '{}': {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            VerifyError::Config(format!(
                "invalid config JSON in '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Fills every unset field of `self` from `fallback`.
    pub fn or(self, fallback: PartialConfig) -> PartialConfig {
        PartialConfig {
            seed: self.seed.or(fallback.seed),
            open: self.open.or(fallback.open),
            bs: self.bs.or(fallback.bs),
            start: self.start.or(fallback.start),
            checkonly: self.checkonly.or(fallback.checkonly),
        }
    }
}
