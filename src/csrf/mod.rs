//! CSRF token sources.
//!
//! The forwarder needs a fresh token for every request it relays. Where that
//! token comes from is hidden behind [`CsrfTokenSource`]:
//!
//! - [`RemoteTokenSource`] asks the backend's token endpoint (production).
//! - [`StaticTokenSource`] hands out a fixed value (tests, local wiring).
//!
//! A source never fails loudly; an unavailable token is reported as `None`
//! and the forwarder turns that into a client error.

pub mod remote;

use async_trait::async_trait;

pub use remote::RemoteTokenSource;

/// Request header carrying the token to the backend.
pub const CSRF_HEADER: &str = "x-csrftoken";

/// Cookie name the backend expects the token under.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Supplier of CSRF tokens.
#[async_trait]
pub trait CsrfTokenSource: Send + Sync {
    /// Fetch a token, or `None` when none is available.
    async fn fetch_token(&self) -> Option<String>;
}

/// A source that always returns the same token.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenSource {
    token: Option<String>,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// A source that never has a token.
    pub fn empty() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl CsrfTokenSource for StaticTokenSource {
    async fn fetch_token(&self) -> Option<String> {
        self.token.clone()
    }
}
