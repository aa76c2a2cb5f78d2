// src/auth/session.rs
// Session lifecycle: startup validation, login, logout, identity queries

use super::claims::{Identity, Role, identity_from_token, now_millis};
use super::token_store::TokenStore;
use crate::error::{Result, TrackerError};
use crate::http::endpoint;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use url::Url;

/// Path of the authentication endpoint, relative to the API base
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Client-side authentication state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Stored credential not yet examined; access decisions must wait
    Uninitialized,
    Authenticated(Identity),
    Anonymous,
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Uninitialized)
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    email_or_username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    data: Option<LoginData>,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    token: Option<String>,
}

/// Owns the session for one process.
///
/// Shared as `Arc<SessionManager>` between the request pipeline and the
/// views; state changes are published through a watch channel so waiters
/// wake when startup validation finishes.
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    http: reqwest::Client,
    base_url: Url,
    state: watch::Sender<SessionState>,
    initialized: AtomicBool,
}

impl SessionManager {
    pub fn new(store: Arc<dyn TokenStore>, http: reqwest::Client, base_url: Url) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self {
            store,
            http,
            base_url,
            state,
            initialized: AtomicBool::new(false),
        }
    }

    /// Validate the stored credential once; later calls return the current state.
    ///
    /// Never touches the network and never fails: a malformed or expired
    /// credential is cleared and the session resolves anonymous.
    pub fn initialize(&self) -> SessionState {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return self.state();
        }

        let resolved = match self.store.read() {
            None => {
                debug!("No stored credential");
                SessionState::Anonymous
            }
            Some(token) => match identity_from_token(&token, now_millis()) {
                Ok(identity) => {
                    info!(username = %identity.username, role = %identity.role, "Session restored");
                    SessionState::Authenticated(identity)
                }
                Err(e) => {
                    if e.is_credential_failure() {
                        info!(error = %e, "Stored credential unusable, clearing");
                    } else {
                        warn!(error = %e, "Stored credential could not be checked, clearing");
                    }
                    self.store.clear();
                    SessionState::Anonymous
                }
            },
        };

        self.publish(resolved.clone());
        resolved
    }

    /// Log in; returns whether the session is now authenticated
    pub async fn login(&self, identifier: &str, password: &str) -> bool {
        match self.try_login(identifier, password).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Login failed");
                false
            }
        }
    }

    /// Log in, keeping the failure reason for the caller.
    ///
    /// On any failure the store and session are left exactly as they were.
    pub async fn try_login(&self, identifier: &str, password: &str) -> Result<Identity> {
        let url = endpoint(&self.base_url, LOGIN_PATH)?;
        let response = self
            .http
            .post(url)
            .json(&LoginRequest {
                email_or_username: identifier,
                password,
            })
            .send()
            .await
            .map_err(|e| TrackerError::LoginFailed(format!("backend unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::LoginFailed(format!("HTTP {}", status.as_u16())));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| TrackerError::LoginFailed(format!("unreadable response: {}", e)))?;
        let token = body
            .data
            .and_then(|d| d.token)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| TrackerError::LoginFailed("response carried no token".to_string()))?;

        let identity = identity_from_token(&token, now_millis())
            .map_err(|e| TrackerError::LoginFailed(format!("unusable token: {}", e)))?;

        self.store
            .save(&token)
            .map_err(|e| TrackerError::LoginFailed(format!("could not store credential: {}", e)))?;
        self.initialized.store(true, Ordering::SeqCst);
        self.publish(SessionState::Authenticated(identity.clone()));

        info!(username = %identity.username, role = %identity.role, "Logged in");
        Ok(identity)
    }

    /// Drop the credential and become anonymous; never fails
    pub fn logout(&self) {
        self.store.clear();
        self.initialized.store(true, Ordering::SeqCst);
        self.publish(SessionState::Anonymous);
        info!("Logged out");
    }

    /// Same as logout, triggered by the backend rejecting the credential
    pub fn expire(&self) {
        self.store.clear();
        self.initialized.store(true, Ordering::SeqCst);
        let previous = self.state.send_replace(SessionState::Anonymous);
        if previous != SessionState::Anonymous {
            warn!("Backend rejected the credential, session dropped");
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// True only while the stored credential has not been examined yet
    pub fn loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Suspend until startup validation has resolved the session
    pub async fn wait_resolved(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|s| !s.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().identity().is_some()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.state
            .borrow()
            .identity()
            .is_some_and(|identity| identity.role == role)
    }

    /// Raw stored credential, valid or not
    pub fn current_token(&self) -> Option<String> {
        self.store.read()
    }

    fn publish(&self, state: SessionState) {
        self.state.send_replace(state);
    }
}
