//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section carries defaults, so an empty file (or no file at all) yields
//! a runnable proxy pointed at `http://localhost:8000`.

use serde::{Deserialize, Serialize};

/// Environment variable that supplies the backend origin.
pub const ORIGIN_ENV_VAR: &str = "PUBLIC_SERVER_URL";

/// Backend origin used when neither the config file nor the environment set one.
pub const DEFAULT_ORIGIN: &str = "http://localhost:8000";

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Authentication backend being proxied to.
    pub backend: BackendConfig,

    /// Request limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Authentication backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend (scheme, host, optional port).
    pub origin: String,

    /// Path prefix under which requests are served and forwarded.
    pub mount_prefix: String,

    /// Backend path that hands out CSRF tokens.
    pub csrf_path: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            mount_prefix: "/_allauth".to_string(),
            csrf_path: "/csrf/".to_string(),
        }
    }
}

impl BackendConfig {
    /// URL of the CSRF token endpoint.
    pub fn csrf_url(&self) -> String {
        format!("{}{}", self.origin, self.csrf_path)
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
