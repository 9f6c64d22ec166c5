//! Header rewriting in both directions.
//!
//! Outbound: inbound headers are replicated minus hop-by-hop headers, `host`
//! and `content-length`, then the CSRF header and cookie are forced.
//! Inbound: the backend's `set-cookie` never reaches the caller.

use axum::http::header::{
    HeaderName, HeaderValue, InvalidHeaderValue, CONNECTION, CONTENT_LENGTH, COOKIE, HOST,
    PROXY_AUTHENTICATE, PROXY_AUTHORIZATION, SET_COOKIE, TE, TRAILER, TRANSFER_ENCODING, UPGRADE,
};
use axum::http::HeaderMap;

use crate::csrf::{CSRF_COOKIE, CSRF_HEADER};

/// Connection-scoped headers a proxy must not relay.
const HOP_BY_HOP: [HeaderName; 7] = [
    CONNECTION,
    PROXY_AUTHENTICATE,
    PROXY_AUTHORIZATION,
    TE,
    TRAILER,
    TRANSFER_ENCODING,
    UPGRADE,
];

const KEEP_ALIVE: &str = "keep-alive";

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    // Headers nominated by the Connection header are hop-by-hop as well.
    let nominated: Vec<HeaderName> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in nominated.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
    headers.remove(KEEP_ALIVE);
}

/// Headers for the backend request.
///
/// Any inbound `cookie` is replaced by `csrftoken={token}`.
pub fn outbound_headers(inbound: &HeaderMap, token: &str) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = inbound.clone();
    strip_hop_by_hop(&mut headers);
    headers.remove(HOST);
    headers.remove(CONTENT_LENGTH);

    headers.insert(CSRF_HEADER, HeaderValue::from_str(token)?);
    headers.insert(COOKIE, HeaderValue::from_str(&format!("{CSRF_COOKIE}={token}"))?);
    Ok(headers)
}

/// Headers relayed to the caller for a response with a body.
pub fn relayed_headers(backend: &HeaderMap) -> HeaderMap {
    let mut headers = backend.clone();
    strip_hop_by_hop(&mut headers);
    headers.remove(SET_COOKIE);
    headers
}
