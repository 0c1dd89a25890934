//! Request client for the backend API.
//!
//! Each screen owns one [`RequestClient`]. Every call made through it writes
//! to the same loading/error slot, so a later call overwrites the state of
//! an earlier one. Screens that need independent tracking create more
//! clients.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use super::abort::AbortSignal;

/// Message shown when a failed response carries no usable explanation.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong, please try again.";

/// Default upper bound for one request, including reading the body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure of a single request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The request never reached the server, timed out, or the response
    /// could not be read or parsed.
    #[error("{0}")]
    NetworkFailure(String),

    /// Non-2xx response carrying a message.
    #[error("{message}")]
    ServerError { status: u16, message: String },

    /// Non-2xx response without a usable message.
    #[error("{message}")]
    UnknownFailure { status: u16, message: String },

    /// The owning screen went away before the response arrived.
    #[error("Request aborted")]
    Aborted,
}

impl RequestError {
    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::ServerError { status, .. } | RequestError::UnknownFailure { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Loading and error status of a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestState {
    pub is_loading: bool,
    pub error: Option<String>,
}

/// One request invocation.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: String,
    body: Option<String>,
    headers: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Sets a pre-serialized body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `body` as JSON and sets the matching content type.
    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, serde_json::Error> {
        let encoded = serde_json::to_string(body)?;
        Ok(self.body(encoded).header("Content-Type", "application/json"))
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn body_text(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(alias = "error")]
    message: String,
}

/// HTTP client with a single loading/error slot.
#[derive(Debug)]
pub struct RequestClient {
    inner: reqwest::Client,
    base_url: String,
    default_headers: Vec<(String, String)>,
    timeout: Duration,
    state: watch::Sender<RequestState>,
}

impl RequestClient {
    /// Creates a client resolving relative paths against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        let (state, _rx) = watch::channel(RequestState::default());
        Self {
            inner: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            state,
        }
    }

    /// Reuses an existing connection pool.
    pub fn with_http_client(mut self, inner: reqwest::Client) -> Self {
        self.inner = inner;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a header sent with every request unless the request overrides it.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    pub fn with_bearer_token(self, token: &SecretString) -> Self {
        self.with_default_header("Authorization", format!("Bearer {}", token.expose_secret()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves a request URL. Absolute URLs pass through untouched.
    fn url(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else if target.starts_with('/') {
            format!("{}{}", self.base_url, target)
        } else {
            format!("{}/{}", self.base_url, target)
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> RequestState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Watches state changes (e.g. to drive a spinner).
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state.subscribe()
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    /// Executes one request and parses the JSON payload.
    ///
    /// Loading is raised and the previous error cleared before dispatch. On
    /// failure the error message is stored and the error returned. If
    /// `signal` fires first, the call returns [`RequestError::Aborted`] and
    /// the state is left alone.
    pub async fn send_request<T: DeserializeOwned>(
        &self,
        request: Request,
        signal: &AbortSignal,
    ) -> Result<T, RequestError> {
        if signal.is_aborted() {
            return Err(RequestError::Aborted);
        }

        let url = self.url(&request.url);
        let method = request.method.clone();

        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
        tracing::debug!("{} {}", method, url);

        let outcome = tokio::select! {
            biased;
            _ = signal.aborted() => {
                tracing::debug!("{} {} aborted", method, url);
                return Err(RequestError::Aborted);
            }
            result = tokio::time::timeout(self.timeout, self.exchange::<T>(&url, request)) => {
                match result {
                    Ok(r) => r,
                    Err(_) => Err(RequestError::NetworkFailure(format!(
                        "Request timed out after {}s",
                        self.timeout.as_secs_f32()
                    ))),
                }
            }
        };

        match &outcome {
            Ok(_) => self.state.send_modify(|s| s.is_loading = false),
            Err(e) => {
                tracing::debug!("{} {} failed: {}", method, url, e);
                let message = e.to_string();
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(message);
                });
            }
        }

        outcome
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        url: &str,
        request: Request,
    ) -> Result<T, RequestError> {
        let headers = self.merged_headers(&request.headers)?;
        let mut builder = self.inner.request(request.method, url).headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RequestError::NetworkFailure(format!("Failed to connect to server: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RequestError::NetworkFailure(format!("Failed to read response: {}", e)))?;

        if status.is_success() {
            parse_payload(&body)
        } else {
            Err(error_from_body(status.as_u16(), &body))
        }
    }

    /// Default headers overlaid with the request's own; request wins.
    fn merged_headers(&self, extra: &[(String, String)]) -> Result<HeaderMap, RequestError> {
        let mut headers = HeaderMap::new();
        for (name, value) in self.default_headers.iter().chain(extra) {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                RequestError::NetworkFailure(format!("Invalid header name: {}", name))
            })?;
            let value = HeaderValue::from_str(value).map_err(|_| {
                RequestError::NetworkFailure(format!("Invalid value for header {}", name))
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

/// Parses a success body. An empty body reads as JSON `null`.
fn parse_payload<T: DeserializeOwned>(body: &str) -> Result<T, RequestError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body)
        .map_err(|e| RequestError::NetworkFailure(format!("Failed to parse response JSON: {}", e)))
}

/// Builds the error for a non-2xx response.
fn error_from_body(status: u16, body: &str) -> RequestError {
    match serde_json::from_str::<ApiError>(body) {
        Ok(err) if !err.message.trim().is_empty() => RequestError::ServerError {
            status,
            message: err.message,
        },
        _ => RequestError::UnknownFailure {
            status,
            message: GENERIC_ERROR_MESSAGE.to_string(),
        },
    }
}
