//! Run configuration.
//!
//! Everything a classification run needs besides its input and output
//! paths. Values come from defaults, an optional JSON file, and command-line
//! overrides, in that order.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::basins::BasinConfig;
use crate::export::RenderOptions;
use crate::terrain::{OceanRule, DEFAULT_COLUMNS};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration for one classification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DivideConfig {
    /// Samples per raster row.
    pub columns: usize,
    /// Land/ocean classification.
    pub ocean_rule: OceanRule,
    /// Coastline and basin expansion parameters.
    pub basins: BasinConfig,
    /// Image rendering parameters.
    pub render: RenderOptions,
}

impl Default for DivideConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            ocean_rule: OceanRule::default(),
            basins: BasinConfig::default(),
            render: RenderOptions::default(),
        }
    }
}

impl DivideConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 {
            return Err(ConfigError::Invalid("columns must be positive".into()));
        }
        if self.basins.min_ocean_cells == 0 {
            return Err(ConfigError::Invalid("basins.min_ocean_cells must be at least 1".into()));
        }
        Ok(())
    }
}
