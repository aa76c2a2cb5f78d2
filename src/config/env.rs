// src/config/env.rs
// Environment-based configuration - every env var the client reads

use std::path::PathBuf;
use tracing::{debug, warn};

pub const API_URL_VAR: &str = "STUDENT_TRACKER_API_URL";
pub const TOKEN_FILE_VAR: &str = "STUDENT_TRACKER_TOKEN_FILE";
pub const TIMEOUT_VAR: &str = "STUDENT_TRACKER_TIMEOUT_SECS";
pub const EPHEMERAL_VAR: &str = "STUDENT_TRACKER_EPHEMERAL";

/// Values taken from the process environment (after `.env` is loaded)
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    /// Backend base URL (STUDENT_TRACKER_API_URL)
    pub api_url: Option<String>,
    /// Credential file override (STUDENT_TRACKER_TOKEN_FILE)
    pub token_file: Option<PathBuf>,
    /// Request timeout in seconds (STUDENT_TRACKER_TIMEOUT_SECS)
    pub timeout_secs: Option<u64>,
    /// Keep the credential in memory only (STUDENT_TRACKER_EPHEMERAL)
    pub ephemeral: bool,
}

impl EnvConfig {
    /// Load from the environment (call once at startup)
    pub fn load() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary lookup; keeps tests away from process env
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let timeout_secs = read(TIMEOUT_VAR).and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(secs) => Some(secs),
            Err(_) => {
                warn!(value = %raw, "Unparseable {}, ignoring", TIMEOUT_VAR);
                None
            }
        });

        let config = Self {
            api_url: read(API_URL_VAR).map(|v| v.trim().to_string()),
            token_file: read(TOKEN_FILE_VAR).map(PathBuf::from),
            timeout_secs,
            ephemeral: read(EPHEMERAL_VAR)
                .and_then(|v| parse_bool(&v))
                .unwrap_or(false),
        };
        debug!(?config, "Environment configuration loaded");
        config
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
