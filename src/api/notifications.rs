// src/api/notifications.rs
// Notifications for the current user, or all of them for staff

use super::pipeline::ApiClient;
use super::types::Timestamp;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const BASE: &str = "/api/notification";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub read_at: Option<Timestamp>,
}

/// Newest first; entries without a timestamp sink to the end
pub fn newest_first(notifications: &mut [Notification]) {
    notifications.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));
}

fn sort_key(n: &Notification) -> Option<DateTime<Utc>> {
    n.created_at.as_ref().and_then(Timestamp::instant)
}

pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}

/// Notifications addressed to the logged-in user
pub async fn mine(api: &ApiClient) -> Result<Vec<Notification>> {
    Ok(api.get(BASE).await?.data.unwrap_or_default())
}

pub async fn all(api: &ApiClient) -> Result<Vec<Notification>> {
    Ok(api
        .get(&format!("{}/viewall", BASE))
        .await?
        .data
        .unwrap_or_default())
}
