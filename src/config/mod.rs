// src/config/mod.rs
// Resolved client configuration: CLI flag > env > config file > default

pub mod env;
pub mod file;

pub use env::EnvConfig;
pub use file::FileConfig;

use crate::error::{Result, TrackerError};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Default backend when nothing is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Default whole-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Directory holding config.toml and the persisted credential
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".student-tracker")
}

/// Values supplied on the command line; `None` means "not given"
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub token_file: Option<PathBuf>,
    pub ephemeral: bool,
}

/// Fully resolved configuration
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub api_url: Url,
    pub token_file: PathBuf,
    pub timeout: Duration,
    /// Keep the credential in memory instead of on disk
    pub ephemeral: bool,
}

impl TrackerConfig {
    /// Load env and file config, then apply CLI overrides
    pub fn load(overrides: Overrides) -> Result<Self> {
        Self::resolve(overrides, EnvConfig::load(), FileConfig::load())
    }

    pub fn resolve(overrides: Overrides, env: EnvConfig, file: FileConfig) -> Result<Self> {
        let raw_url = overrides
            .api_url
            .or(env.api_url)
            .or(file.api.base_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = parse_base_url(&raw_url)?;

        let token_file = overrides
            .token_file
            .or(env.token_file)
            .or(file.session.token_file)
            .unwrap_or_else(|| home_dir().join("token"));

        let timeout = Duration::from_secs(
            env.timeout_secs
                .or(file.api.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        );

        let config = Self {
            api_url,
            token_file,
            timeout,
            ephemeral: overrides.ephemeral || env.ephemeral,
        };
        info!(
            api_url = %config.api_url,
            token_file = %config.token_file.display(),
            ephemeral = config.ephemeral,
            "Configuration resolved"
        );
        Ok(config)
    }
}

/// Parse a base URL; only http(s) is accepted.
///
/// The path always ends in `/` so API paths join beneath any prefix.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let prefixed = format!("{}/", url.path());
        url.set_path(&prefixed);
    }
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(TrackerError::Config(format!(
            "unsupported scheme '{}' in API URL",
            other
        ))),
    }
}
