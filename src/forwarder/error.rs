//! Forwarding failures and their client-facing rendering.

use axum::http::header::InvalidHeaderValue;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http_body_util::LengthLimitError;
use thiserror::Error;

/// Errors that can occur while relaying a request.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The token source had nothing to give.
    #[error("CSRF token is missing or invalid")]
    MissingCsrfToken,

    /// The token cannot be encoded as a header value.
    #[error("CSRF token is not a valid header value: {0}")]
    InvalidCsrfToken(#[from] InvalidHeaderValue),

    /// The inbound body exceeded `security.max_body_size`.
    #[error("request body exceeds the configured limit")]
    PayloadTooLarge,

    /// The inbound body could not be read.
    #[error("failed to read request body: {0}")]
    RequestBody(#[source] axum::Error),

    /// The backend call failed, or its body could not be read.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl ForwardError {
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::MissingCsrfToken => StatusCode::BAD_REQUEST,
            ForwardError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to the caller. Internal details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            ForwardError::MissingCsrfToken => "CSRF token is missing or invalid",
            ForwardError::PayloadTooLarge => "Payload Too Large",
            _ => "Internal Server Error",
        }
    }
}

impl ForwardError {
    /// Classify a failure to read the inbound body.
    ///
    /// Chunked bodies are only cut off by the body limit while streaming, so
    /// the limit error surfaces here, wrapped in one or more `axum::Error`s.
    pub fn from_body_error(err: axum::Error) -> Self {
        let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&err);
        while let Some(e) = source {
            if e.is::<LengthLimitError>() {
                return ForwardError::PayloadTooLarge;
            }
            source = e.source();
        }
        ForwardError::RequestBody(err)
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.public_message() });
        (self.status(), Json(body)).into_response()
    }
}
