// In: src/config.rs

//! The single source of truth for merlin column layer configuration.
//!
//! `MerlinConfig` is created once at the application boundary (e.g. from a JSON
//! file) and used to build the `DTypeRegistry` and to switch on logging. It is
//! read-only after that.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MerlinError;
use crate::types::MappingKind;

/// The unified configuration for the merlin column layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct MerlinConfig {
    /// Which built-in dtype mappings the registry is built with.
    #[serde(default = "default_mappings")]
    pub mappings: Vec<MappingKind>,

    /// If true, `observability::init_from_config` turns on `info` level logging.
    #[serde(default)]
    pub verbose_logging: bool,

    /// Where log lines are appended. Logs go to stderr when unset.
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for MerlinConfig {
    fn default() -> Self {
        Self {
            mappings: default_mappings(),
            verbose_logging: false,
            log_file: None,
        }
    }
}

impl MerlinConfig {
    pub fn from_json(json: &str) -> Result<Self, MerlinError> {
        let config: MerlinConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MerlinError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn validate(&self) -> Result<(), MerlinError> {
        for (i, kind) in self.mappings.iter().enumerate() {
            if self.mappings[..i].contains(kind) {
                return Err(MerlinError::ConfigError(format!(
                    "mapping '{}' is listed more than once",
                    kind
                )));
            }
        }
        if self.log_file.is_some() && !self.verbose_logging {
            log::warn!("`log_file` is set but `verbose_logging` is off; nothing will be written");
        }
        Ok(())
    }
}

/// Helper for `serde` to default to every built-in mapping.
fn default_mappings() -> Vec<MappingKind> {
    MappingKind::ALL.to_vec()
}
