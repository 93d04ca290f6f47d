//! # Configuration
//!
//! Cardboard configuration is a [`confique`] struct loaded from layered sources,
//! highest priority first:
//!
//! 1. **Environment variables**: `CARDBOARD_DATA_DIR`, `CARDBOARD_LOG_LEVEL`.
//! 2. **Config file**: `cardboard.toml` in the OS config directory (via the
//!    `directories` crate). A missing file is fine.
//! 3. **Compiled defaults**: `#[config(default = ...)]` below.
//!
//! Command-line flags such as `--data-dir` are applied by the client on top.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data dir | Root of the document store |
//! | `log_level` | `warn` | Log filter used when `RUST_LOG` is unset |
//! | `default_topic_x` | `50` | Canvas x for topics created without a position |
//! | `default_topic_y` | `50` | Canvas y for topics created without a position |

use crate::error::{CardboardError, Result};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "cardboard.toml";

/// Configuration for cardboard, stored in `cardboard.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CardboardConfig {
    /// Root directory of the document store.
    #[config(env = "CARDBOARD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log filter, e.g. "warn", "debug" or "cardboardapp=trace".
    #[config(env = "CARDBOARD_LOG_LEVEL", default = "warn")]
    pub log_level: String,

    #[config(default = 50.0)]
    pub default_topic_x: f64,

    #[config(default = 50.0)]
    pub default_topic_y: f64,
}

impl Default for CardboardConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: "warn".to_string(),
            default_topic_x: 50.0,
            default_topic_y: 50.0,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "cardboard", "cardboard")
}

impl CardboardConfig {
    /// Where the global `cardboard.toml` lives, if the OS has a config dir.
    pub fn default_file() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Loads from the environment, the global config file and defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_file().as_deref())
    }

    /// Like [`CardboardConfig::load`] with an explicit config file.
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        builder
            .load()
            .map_err(|e| CardboardError::Config(e.to_string()))
    }

    /// The configured store root, falling back to the OS data directory.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                CardboardError::Config(
                    "no data directory configured and none could be determined for this OS".into(),
                )
            })
    }
}
