// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Stored as JSON in `<config_dir>/camera-preview/config.json`. Every field
//! has a default, so partial files are accepted and a missing file means
//! "use defaults".

use crate::constants::paths;
use crate::errors::{AppError, AppResult};
use crate::frame_processor::{ProcessMode, ProcessorOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mode the processor starts in
    pub mode: ProcessMode,
    /// Edge-detection and chroma-order tuning
    pub processor: ProcessorOptions,
}

impl Config {
    /// Default location of the config file, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join(paths::CONFIG_DIR_NAME)
                .join(paths::CONFIG_FILE_NAME)
        })
    }

    /// Load from `path`, or from [`Config::default_path`] when `None`
    ///
    /// An explicit path must exist. The default path falls back to defaults
    /// when absent.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => {
                    debug!("No config directory, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !explicit && !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)?;
        let config = Self::from_json(&text)?;
        info!(path = %path.display(), mode = %config.mode, "Loaded config");
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json(text: &str) -> AppResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.processor
            .edge
            .validate()
            .map_err(|e| AppError::Config(format!("processor.edge: {}", e)))
    }
}
