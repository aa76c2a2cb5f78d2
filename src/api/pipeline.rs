// src/api/pipeline.rs
// Request pipeline: bearer credential out, global 401 handling in

use super::types::{ApiResponse, error_message};
use crate::auth::SessionManager;
use crate::error::{Result, TrackerError};
use crate::http::endpoint;
use crate::routes::View;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use url::Url;

/// Receives navigations forced by the pipeline
pub trait Navigator: Send + Sync {
    fn navigate(&self, view: View);
}

/// Navigator that remembers where it was last sent
#[derive(Debug, Default)]
pub struct NavigationLog {
    last: Mutex<Option<View>>,
    count: AtomicUsize,
}

impl NavigationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<View> {
        *self.last.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of forced navigations so far
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Navigator for NavigationLog {
    fn navigate(&self, view: View) {
        *self.last.lock().unwrap_or_else(|e| e.into_inner()) = Some(view);
        self.count.fetch_add(1, Ordering::SeqCst);
        debug!(view = %view, "Navigation forced");
    }
}

/// Every API call goes through here.
///
/// The credential is read from the session's store on each request, so a
/// login or logout takes effect on the next call without rebuilding the
/// client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<SessionManager>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        http: reqwest::Client,
        base_url: Url,
        session: Arc<SessionManager>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            http,
            base_url,
            session,
            navigator,
        }
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = endpoint(&self.base_url, path)?;
        Ok(self.with_credential(self.http.request(method, url)))
    }

    fn with_credential(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.current_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and apply the inbound rules.
    ///
    /// 401 drops the session and forces navigation to login; any other
    /// non-2xx becomes `TrackerError::Status`. Nothing is retried.
    async fn execute(&self, builder: RequestBuilder) -> Result<reqwest::Response> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!(url = %response.url(), "Request unauthorized, dropping session");
            self.session.expire();
            self.navigator.navigate(View::Login);
            return Err(TrackerError::Unauthorized);
        }

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("request failed");
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::Status {
                status: status.as_u16(),
                message: error_message(&body, reason),
            });
        }

        Ok(response)
    }

    async fn envelope<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<ApiResponse<T>> {
        let response = self.execute(builder).await?;
        let text = response.text().await?;
        let envelope: ApiResponse<T> = serde_json::from_str(&text)?;
        envelope.checked()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        self.envelope(self.request(Method::GET, path)?).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.envelope(self.request(Method::GET, path)?.query(query)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.envelope(self.request(Method::POST, path)?.json(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.envelope(self.request(Method::PUT, path)?.json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        self.envelope(self.request(Method::DELETE, path)?).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<ApiResponse<T>> {
        self.envelope(self.request(Method::POST, path)?.multipart(form))
            .await
    }
}
