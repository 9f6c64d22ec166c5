//! Authentication API reverse-proxy shim.
//!
//! Relays `/_allauth/*` requests from a frontend to the authentication
//! backend, attaching a fresh CSRF token to each request and keeping the
//! backend's `set-cookie` away from the caller.

pub mod config;
pub mod csrf;
pub mod forwarder;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use forwarder::{ForwardError, ForwardRequest, ForwardedResponse, Forwarder};
pub use http::HttpServer;
