// src/config/file.rs
// File-based configuration from ~/.student-tracker/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Top-level config structure
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub session: SessionSection,
}

/// `[api]` section
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ApiSection {
    /// Backend base URL
    pub base_url: Option<String>,
    /// Whole-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// `[session]` section
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct SessionSection {
    /// Where the credential is persisted
    pub token_file: Option<PathBuf>,
}

impl FileConfig {
    /// Load config from ~/.student-tracker/config.toml
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit path; a missing or broken file yields defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config from file");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config file");
                    Self::default()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        super::home_dir().join("config.toml")
    }
}
