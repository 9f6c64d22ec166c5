//! Request forwarding to the authentication backend.
//!
//! # Data Flow
//! ```text
//! ForwardRequest (method, path, query, headers, body)
//!     → target.rs (build {origin}/_allauth/{path}{query})
//!     → csrf token source (one fetch, no caching)
//!     → headers.rs (replicate inbound, force CSRF header + cookie)
//!     → backend call (one attempt, no retry)
//!     → headers.rs (drop set-cookie)
//!     → ForwardedResponse (status, headers, raw body)
//! ```
//!
//! # Design Decisions
//! - No token means no backend call: the request fails with 400
//! - Every other failure becomes a 500 with a generic JSON body
//! - Backend statuses are relayed verbatim, including 4xx/5xx
//! - A 204 is relayed with the backend headers untouched

pub mod error;
pub mod headers;
pub mod target;

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::config::BackendConfig;
use crate::csrf::CsrfTokenSource;

pub use error::ForwardError;
pub use target::QueryMode;

/// A request to relay, detached from the inbound connection.
#[derive(Debug, Clone)]
pub struct ForwardRequest {
    pub method: Method,
    /// Wildcard path below the mount prefix, without a leading slash.
    pub path: String,
    /// Raw inbound query string, without the `?`.
    pub query: Option<String>,
    pub headers: HeaderMap,
    /// Ignored for GET and HEAD.
    pub body: Option<Bytes>,
    pub query_mode: QueryMode,
    pub require_trailing_slash: bool,
}

impl ForwardRequest {
    /// A request with no headers or body, using the query mode of `method`.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            query_mode: QueryMode::for_method(&method),
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: None,
            require_trailing_slash: false,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn require_trailing_slash(mut self, required: bool) -> Self {
        self.require_trailing_slash = required;
        self
    }

    fn carries_body(&self) -> bool {
        self.method != Method::GET && self.method != Method::HEAD
    }
}

/// The backend's answer, ready to relay.
#[derive(Debug, Clone)]
pub struct ForwardedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// `None` for 204 responses.
    pub body: Option<Bytes>,
}

impl IntoResponse for ForwardedResponse {
    fn into_response(self) -> Response {
        let body = self.body.map(Body::from).unwrap_or_else(Body::empty);
        let mut response = Response::new(body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Relays requests to a single backend origin.
///
/// Cheap to share: holds only the immutable origin, a pooled client and the
/// token source.
pub struct Forwarder {
    origin: String,
    mount_prefix: String,
    client: reqwest::Client,
    tokens: Arc<dyn CsrfTokenSource>,
}

/// Client for backend calls. Connects directly, ignoring `HTTP(S)_PROXY`.
pub fn backend_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().no_proxy().build()
}

impl Forwarder {
    pub fn new(
        config: &BackendConfig,
        tokens: Arc<dyn CsrfTokenSource>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(config, backend_client()?, tokens))
    }

    pub fn with_client(
        config: &BackendConfig,
        client: reqwest::Client,
        tokens: Arc<dyn CsrfTokenSource>,
    ) -> Self {
        Self {
            origin: config.origin.clone(),
            mount_prefix: config.mount_prefix.clone(),
            client,
            tokens,
        }
    }

    /// The backend URL `request` will be sent to.
    pub fn target_url(&self, request: &ForwardRequest) -> String {
        let query = request.query_mode.render(request.query.as_deref());
        target::build_target_url(
            &self.origin,
            &self.mount_prefix,
            &request.path,
            &query,
            request.require_trailing_slash,
        )
    }

    /// Relay one request to the backend.
    pub async fn forward(&self, request: ForwardRequest) -> Result<ForwardedResponse, ForwardError> {
        let target = self.target_url(&request);

        let token = self
            .tokens
            .fetch_token()
            .await
            .filter(|t| !t.is_empty())
            .ok_or(ForwardError::MissingCsrfToken)?;

        let headers = headers::outbound_headers(&request.headers, &token)?;

        tracing::debug!(method = %request.method, url = %target, "Forwarding to backend");

        let mut outbound = self
            .client
            .request(request.method.clone(), &target)
            .headers(headers);
        if request.carries_body() {
            outbound = outbound.body(request.body.clone().unwrap_or_default());
        }

        let response = outbound.send().await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(ForwardedResponse {
                status,
                headers: response.headers().clone(),
                body: None,
            });
        }

        let headers = headers::relayed_headers(response.headers());
        let body = response.bytes().await?;

        Ok(ForwardedResponse {
            status,
            headers,
            body: Some(body),
        })
    }
}
