//! Authenticated request pipeline for the Auto Deploy REST API.
//!
//! Every call reads the current token from the [`SessionStore`] at dispatch
//! time and attaches it as a bearer credential. A 401 on a protected request
//! clears the session (if it still holds the token that was sent) and emits a
//! navigation to the login route before the error is handed back to the
//! caller. Nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::auth::SessionStore;
use crate::config::Config;
use crate::navigation::{Navigator, Route};

use super::ApiError;

/// How a 401 on this request is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Access {
    /// A 401 means the attached token was rejected: forced logout.
    #[default]
    Protected,
    /// Login and registration. A 401 means the submitted credentials were
    /// wrong; the session is left alone.
    Public,
}

/// One outbound call to the backend.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
    headers: HeaderMap,
    access: Access,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
            access: Access::Protected,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body).map_err(ApiError::Encode)?);
        Ok(self)
    }

    /// Add a caller header. `Authorization` is always owned by the session
    /// and is dropped at dispatch.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn public(mut self) -> Self {
        self.access = Access::Public;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn access(&self) -> Access {
        self.access
    }
}

/// API client for the Auto Deploy backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
    navigator: Navigator,
}

impl ApiClient {
    /// Create a client for the configured backend
    pub fn new(
        config: &Config,
        session: Arc<SessionStore>,
        navigator: Navigator,
    ) -> Result<Self, ApiError> {
        Self::with_base_url(config.base_url(), config.request_timeout(), session, navigator)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<SessionStore>,
        navigator: Navigator,
    ) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            navigator,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Dispatch a request and decode the JSON payload.
    ///
    /// An empty success body decodes as JSON `null`, so `()`, `Option<T>`
    /// and `serde_json::Value` accept it.
    pub async fn send<T: DeserializeOwned>(&self, request: Request) -> Result<T, ApiError> {
        let Request {
            method,
            path,
            body,
            mut headers,
            access,
        } = request;

        let url = self.url(&path);
        let token = self.session.current_token();
        headers.remove(header::AUTHORIZATION);

        debug!(method = %method, path = %path, authenticated = token.is_some(), "Dispatching request");

        let mut builder = self.client.request(method.clone(), &url).headers(headers);
        if let Some(ref token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(ref body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(method = %method, path = %path, error = %e, "Request failed to complete");
            ApiError::Network(e)
        })?;

        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await?;
            return Self::decode(&bytes, &path);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            return Err(self.handle_unauthorized(access, token.as_deref(), &path, &body));
        }

        debug!(status = status.as_u16(), path = %path, "Request rejected");
        Err(ApiError::from_status(status, &body))
    }

    /// Only the token attached at dispatch is cleared; a session established
    /// while the request was in flight survives its late rejection.
    fn handle_unauthorized(
        &self,
        access: Access,
        token: Option<&str>,
        path: &str,
        body: &str,
    ) -> ApiError {
        match access {
            Access::Protected => {
                let cleared = token.is_some_and(|t| self.session.clear_if_token(t));
                if cleared {
                    warn!(path, "Token rejected by backend, forcing logout");
                }
                if self.session.is_authenticated() {
                    debug!(path, "Rejected token is no longer current, session kept");
                } else {
                    self.navigator.navigate(Route::Login);
                }
                ApiError::Unauthorized
            }
            Access::Public => ApiError::InvalidCredentials(ApiError::extract_message(body)),
        }
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8], path: &str) -> Result<T, ApiError> {
        let bytes = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null".as_slice()
        } else {
            bytes
        };
        serde_json::from_slice(bytes).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", path, e))
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Request::get(path)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Request::post(path).json(body)?).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Request::put(path).json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Request::delete(path)).await
    }
}
