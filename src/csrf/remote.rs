//! Token source backed by the authentication backend's CSRF endpoint.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::BackendConfig;
use crate::csrf::CsrfTokenSource;
use crate::forwarder::backend_client;

/// Body returned by the token endpoint.
#[derive(Debug, Deserialize)]
struct CsrfTokenBody {
    #[serde(rename = "csrfToken")]
    csrf_token: Option<String>,
}

/// Fetches a token with `GET {origin}{csrf_path}` on every call.
#[derive(Debug, Clone)]
pub struct RemoteTokenSource {
    client: reqwest::Client,
    url: String,
}

impl RemoteTokenSource {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(backend_client()?, config.csrf_url()))
    }
}

#[async_trait]
impl CsrfTokenSource for RemoteTokenSource {
    async fn fetch_token(&self) -> Option<String> {
        let response = match self.client.get(&self.url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "CSRF token request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %self.url, status = %status, "CSRF endpoint returned an error status");
            return None;
        }

        match response.json::<CsrfTokenBody>().await {
            Ok(body) => body.csrf_token,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "CSRF endpoint returned an unreadable body");
                None
            }
        }
    }
}
