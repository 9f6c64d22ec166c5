//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the backend origin is an absolute http(s) URL
//! - Validate addresses and path prefixes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backend.origin `{origin}` is not a valid URL: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    #[error("backend.origin `{0}` must use http or https")]
    UnsupportedScheme(String),

    #[error("backend.origin `{0}` must not carry a query or fragment")]
    OriginHasQuery(String),

    #[error("{field} `{value}` is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} `{value}` must start with '/'")]
    RelativePath { field: &'static str, value: String },

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_origin(&config.backend.origin) {
        errors.push(e);
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    // An empty prefix mounts the proxy at the root.
    if !config.backend.mount_prefix.is_empty() {
        check_absolute_path(&mut errors, "backend.mount_prefix", &config.backend.mount_prefix);
    }
    check_absolute_path(&mut errors, "backend.csrf_path", &config.backend.csrf_path);

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_origin(origin: &str) -> Result<(), ValidationError> {
    let url = Url::parse(origin).map_err(|e| ValidationError::InvalidOrigin {
        origin: origin.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::UnsupportedScheme(origin.to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ValidationError::OriginHasQuery(origin.to_string()));
    }
    Ok(())
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_absolute_path(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if !value.starts_with('/') {
        errors.push(ValidationError::RelativePath {
            field,
            value: value.to_string(),
        });
    }
}
