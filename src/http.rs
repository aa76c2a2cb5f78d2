// src/http.rs
// Shared HTTP client for every backend call

use crate::error::Result;
use std::time::Duration;
use url::Url;

/// Connect timeout; the whole-request timeout comes from configuration
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Create the shared HTTP client.
///
/// Created once at startup and handed to both the session manager (login)
/// and the request pipeline, so they share one connection pool. Timeouts
/// live here and nowhere else.
pub fn create_shared_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(concat!("student-tracker/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Resolve an API path under the base URL.
///
/// The base may sit behind a path prefix (`https://host/tracker-api`), so
/// the path is joined relative to it and never replaces it.
pub fn endpoint(base: &Url, path: &str) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let prefixed = format!("{}/", base.path());
        base.set_path(&prefixed);
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}
