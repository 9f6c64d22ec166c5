//! Response relay.
//!
//! # Responsibilities
//! - Turn a forwarding outcome into the client response
//! - Report failures on the operator-facing error channel
//! - Record request metrics
//!
//! # Design Decisions
//! - Backend statuses are relayed verbatim; only local failures produce
//!   the proxy's own JSON error bodies
//! - Missing CSRF tokens and oversized bodies are client problems and
//!   logged at `warn`

use std::time::Instant;

use axum::http::Method;
use axum::response::{IntoResponse, Response};

use crate::forwarder::{ForwardError, ForwardedResponse};
use crate::observability::metrics;

/// Render the outcome of one forwarded request.
pub fn relay_outcome(
    outcome: Result<ForwardedResponse, ForwardError>,
    method: &Method,
    request_id: &str,
    start: Instant,
) -> Response {
    let response = match outcome {
        Ok(forwarded) => {
            tracing::debug!(
                request_id = %request_id,
                status = %forwarded.status,
                "Relaying backend response"
            );
            forwarded.into_response()
        }
        Err(err @ ForwardError::MissingCsrfToken) => {
            tracing::warn!(request_id = %request_id, "CSRF token unavailable, request rejected");
            err.into_response()
        }
        Err(err @ ForwardError::PayloadTooLarge) => {
            tracing::warn!(request_id = %request_id, "Request body over limit, request rejected");
            err.into_response()
        }
        Err(err) => {
            tracing::error!(request_id = %request_id, error = %err, "Error forwarding request");
            err.into_response()
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}
