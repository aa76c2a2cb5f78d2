// src/api/profile.rs
// Current user's profile: view, edit, password change

use super::pipeline::ApiClient;
use super::types::Timestamp;
use crate::auth::Role;
use crate::error::{Result, TrackerError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::info;

pub const PROFILE_PATH: &str = "/api/profile";
pub const UPDATE_PATH: &str = "/api/profile/update";
pub const PASSWORD_PATH: &str = "/api/profile/update-password";

pub const MIN_PASSWORD_LEN: usize = 6;
const PHONE_LEN: std::ops::RangeInclusive<usize> = 10..=15;

// Static literal patterns; compilation cannot fail.
#[allow(clippy::expect_used)]
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));
#[allow(clippy::expect_used)]
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub name: Option<String>,
    pub username: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

/// Editable profile fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
}

impl ProfileUpdate {
    /// Start from the current profile so unchanged fields carry over
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone().unwrap_or_default(),
            username: profile.username.clone(),
            email: profile.email.clone().unwrap_or_default(),
            phone: profile.phone.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TrackerError::validation("name", "must not be blank"));
        }
        if self.username.trim().is_empty() {
            return Err(TrackerError::validation("username", "must not be blank"));
        }

        let email = self.email.trim();
        if email.is_empty() {
            return Err(TrackerError::validation("email", "must not be blank"));
        }
        if !EMAIL_RE.is_match(email) {
            return Err(TrackerError::validation("email", "not a valid address"));
        }

        let phone = self.phone.trim();
        if phone.is_empty() {
            return Err(TrackerError::validation("phone", "must not be blank"));
        }
        if !PHONE_RE.is_match(phone) {
            return Err(TrackerError::validation("phone", "digits only"));
        }
        if !PHONE_LEN.contains(&phone.len()) {
            return Err(TrackerError::validation("phone", "must be 10-15 digits"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
    pub confirmation: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordChangeRequest<'a> {
    old_password: &'a str,
    new_password: &'a str,
}

impl PasswordChange {
    pub fn validate(&self) -> Result<()> {
        if self.old_password.trim().is_empty() {
            return Err(TrackerError::validation("old password", "must not be blank"));
        }
        if self.new_password.trim().is_empty() {
            return Err(TrackerError::validation("new password", "must not be blank"));
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(TrackerError::validation(
                "new password",
                format!("must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }
        if self.new_password == self.old_password {
            return Err(TrackerError::validation(
                "new password",
                "must differ from the old password",
            ));
        }
        if self.confirmation != self.new_password {
            return Err(TrackerError::validation("confirmation", "does not match"));
        }
        Ok(())
    }
}

pub async fn fetch(api: &ApiClient) -> Result<Profile> {
    api.get(PROFILE_PATH).await?.into_data()
}

/// Validate, then submit; returns the backend's confirmation message
pub async fn update(api: &ApiClient, changes: &ProfileUpdate) -> Result<String> {
    changes.validate()?;
    let message = api
        .post::<serde_json::Value, _>(UPDATE_PATH, changes)
        .await?
        .into_message("Profile updated")?;
    info!(username = %changes.username, "Profile updated");
    Ok(message)
}

pub async fn change_password(api: &ApiClient, change: &PasswordChange) -> Result<String> {
    change.validate()?;
    let body = PasswordChangeRequest {
        old_password: &change.old_password,
        new_password: &change.new_password,
    };
    let message = api
        .post::<serde_json::Value, _>(PASSWORD_PATH, &body)
        .await?
        .into_message("Password updated")?;
    info!("Password changed");
    Ok(message)
}
