use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{LineShapeError, LineShapeResult, PlasmaConditions};
use crate::stark::{StarkAccuracy, TableRoots};

pub const DEFAULT_OVERSAMPLING: usize = 50;
pub const MIN_OVERSAMPLING: usize = 16;

/// Synthesizer-level settings shared by every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SynthesisConfig {
    /// Fine-axis upsampling factor; values below the minimum are raised.
    #[serde(default = "default_oversampling")]
    pub oversampling: usize,
    #[serde(default)]
    pub stark_accuracy: StarkAccuracy,
    #[serde(default)]
    pub table_roots: TableRoots,
    /// Conditions applied beneath instance and per-call values.
    #[serde(default)]
    pub defaults: PlasmaConditions,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            oversampling: DEFAULT_OVERSAMPLING,
            stark_accuracy: StarkAccuracy::default(),
            table_roots: TableRoots::default(),
            defaults: PlasmaConditions::default(),
        }
    }
}

impl SynthesisConfig {
    pub fn effective_oversampling(&self) -> usize {
        self.oversampling.max(MIN_OVERSAMPLING)
    }

    /// Resolves relative table roots against `base`.
    pub fn with_roots_relative_to(mut self, base: &Path) -> Self {
        for root in [&mut self.table_roots.hydrogen, &mut self.table_roots.helium]
            .into_iter()
            .flatten()
        {
            if root.is_relative() {
                *root = base.join(&*root);
            }
        }
        self
    }
}

fn default_oversampling() -> usize {
    DEFAULT_OVERSAMPLING
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read synthesis config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse synthesis config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl From<ConfigError> for LineShapeError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::Read { .. } => Self::missing_data("IO.CONFIG_READ", error.to_string()),
            ConfigError::Parse { .. } => {
                Self::invalid_parameter("INPUT.CONFIG_PARSE", error.to_string())
            }
        }
    }
}

pub fn load_synthesis_config(config_path: impl AsRef<Path>) -> Result<SynthesisConfig, ConfigError> {
    let config_path = config_path.as_ref();
    let source = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| ConfigError::Parse {
        path: config_path.to_path_buf(),
        source,
    })
}

/// Loads a config and validates its default conditions.
pub fn load_validated_config(config_path: impl AsRef<Path>) -> LineShapeResult<SynthesisConfig> {
    let config = load_synthesis_config(config_path)?;
    config.defaults.resolve()?;
    Ok(config)
}
