//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{ProxyConfig, ORIGIN_ENV_VAR};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration for the running process.
///
/// Starts from defaults, layers the TOML file on top when one is given, then
/// applies `PUBLIC_SERVER_URL` from the environment and validates the result.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let config = match path {
        Some(path) => parse_config_file(path)?,
        None => ProxyConfig::default(),
    };
    finalize(config, |key| std::env::var(key).ok())
}

/// Read and deserialize a TOML file without validating it.
pub fn parse_config_file(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment overrides, normalize, and validate.
///
/// `lookup` resolves environment variables; the process environment is used
/// by [`load_config`].
pub fn finalize<F>(mut config: ProxyConfig, lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(origin) = lookup(ORIGIN_ENV_VAR).filter(|v| !v.is_empty()) {
        config.backend.origin = origin;
    }

    let trimmed = config.backend.origin.trim_end_matches('/').len();
    config.backend.origin.truncate(trimmed);
    let trimmed = config.backend.mount_prefix.trim_end_matches('/').len();
    config.backend.mount_prefix.truncate(trimmed);

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_env_overrides_origin() {
        let config = finalize(ProxyConfig::default(), |key| {
            (key == "PUBLIC_SERVER_URL").then(|| "https://auth.internal:8443".to_string())
        })
        .unwrap();

        assert_eq!(config.backend.origin, "https://auth.internal:8443");
    }

    #[test]
    fn test_empty_env_value_keeps_default() {
        let config = finalize(ProxyConfig::default(), |_| Some(String::new())).unwrap();
        assert_eq!(config.backend.origin, "http://localhost:8000");
    }

    #[test]
    fn test_trailing_slash_trimmed_from_origin() {
        let mut config = ProxyConfig::default();
        config.backend.origin = "http://backend:8000/".into();

        let config = finalize(config, no_env).unwrap();
        assert_eq!(config.backend.origin, "http://backend:8000");
    }

    #[test]
    fn test_file_then_env_layering() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[listener]\nbind_address = \"127.0.0.1:4000\"\n\n[backend]\norigin = \"http://from-file:8000\""
        )
        .unwrap();

        let parsed = parse_config_file(file.path()).unwrap();
        assert_eq!(parsed.backend.origin, "http://from-file:8000");

        let config = finalize(parsed, |_| Some("http://from-env:8000".into())).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:4000");
        assert_eq!(config.backend.origin, "http://from-env:8000");
    }

    #[test]
    fn test_invalid_file_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[backend\norigin = ").unwrap();

        let err = parse_config_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_message_lists_problems() {
        let mut config = ProxyConfig::default();
        config.security.max_body_size = 0;

        let err = finalize(config, no_env).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: security.max_body_size must be greater than zero"
        );
    }
}
