//! Persisted settings: last-used folders, options, and custom profiles.

mod config_io;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    app_dirs,
    naming::StructureMode,
    organize::{ConflictPolicy, Operation},
    profiles::{DEFAULT_PROFILE, HardwareProfile},
};

pub use config_io::{CONFIG_FILE_NAME, config_path, load_from_path, load_or_default, save, save_to_path};

/// Settings stored in `.sampson/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Last active source directory.
    #[serde(default)]
    pub source: Option<PathBuf>,
    /// Last destination directory.
    #[serde(default)]
    pub destination: Option<PathBuf>,
    #[serde(default)]
    pub operation: Operation,
    #[serde(default = "default_true")]
    pub dry_run: bool,
    #[serde(default)]
    pub keep_names: bool,
    #[serde(default = "default_profile")]
    pub profile: String,
    #[serde(default)]
    pub structure: StructureMode,
    #[serde(default)]
    pub conflict: ConflictPolicy,
    /// Extra hardware profiles; same-named entries replace built-ins.
    #[serde(default)]
    pub profiles: Vec<HardwareProfile>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            source: None,
            destination: None,
            operation: Operation::default(),
            dry_run: true,
            keep_names: false,
            profile: default_profile(),
            structure: StructureMode::default(),
            conflict: ConflictPolicy::default(),
            profiles: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_profile() -> String {
    DEFAULT_PROFILE.to_string()
}

/// Errors that may occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to create the config directory.
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    /// No usable config directory found.
    #[error("No suitable config directory found")]
    NoConfigDir,
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}
