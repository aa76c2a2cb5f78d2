// src/api/types.rs
// Response envelope and small wire types shared by every endpoint

use crate::error::{Result, TrackerError};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Envelope every backend endpoint wraps its payload in
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// HTTP-like status repeated in the body; absent is treated as 200
    pub status: Option<u16>,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn is_ok(&self) -> bool {
        self.status.is_none_or(|s| s == 200)
    }

    /// Turn a body-level failure into `TrackerError::Rejected`
    pub fn checked(self) -> Result<Self> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(TrackerError::Rejected {
                status: self.status.unwrap_or_default(),
                message: self
                    .message
                    .unwrap_or_else(|| "request rejected".to_string()),
            })
        }
    }

    /// Payload of a successful response
    pub fn into_data(self) -> Result<T> {
        let checked = self.checked()?;
        checked.data.ok_or_else(|| TrackerError::Rejected {
            status: checked.status.unwrap_or(200),
            message: checked
                .message
                .unwrap_or_else(|| "response carried no data".to_string()),
        })
    }

    /// Message of a successful response, or `fallback`
    pub fn into_message(self, fallback: &str) -> Result<String> {
        let checked = self.checked()?;
        Ok(checked.message.unwrap_or_else(|| fallback.to_string()))
    }
}

/// A backend timestamp: epoch milliseconds or a preformatted string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Text(String),
}

impl Timestamp {
    /// The instant this timestamp names; zone-less text is read as UTC
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms),
            Timestamp::Text(text) => DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.with_timezone(&Utc))
                .or_else(|_| {
                    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
                })
                .ok(),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Millis(ms) => match DateTime::from_timestamp_millis(*ms) {
                Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
                None => write!(f, "{}", ms),
            },
            Timestamp::Text(text) => match DateTime::parse_from_rfc3339(text) {
                Ok(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
                Err(_) => f.write_str(text),
            },
        }
    }
}

/// Extract a human-readable failure message from an error body
pub(crate) fn error_message(body: &str, fallback: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .filter(|m| !m.trim().is_empty());

    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => fallback.to_string(),
        None => body.trim().chars().take(200).collect(),
    }
}
