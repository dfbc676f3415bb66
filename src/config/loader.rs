//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(
        "validation failed: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )]
    Validation(Vec<ValidationError>),
}

/// Read a TOML configuration file. Missing fields take their defaults.
///
/// The result is not validated; callers apply overrides first and validate
/// the merged configuration.
pub fn read_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ProxyConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config(
            r#"
            [listener]
            port = 9090

            [cors]
            allow_origin = "https://app.example.com"

            [forwarding]
            trust_proxy = true
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.port, 9090);
        assert_eq!(config.listener.address, "127.0.0.1");
        assert_eq!(config.cors.allow_origin, "https://app.example.com");
        assert!(config.forwarding.trust_proxy);
        assert_eq!(config.timeouts.response_secs, 60);
    }

    #[test]
    fn test_parse_empty_is_default() {
        assert_eq!(parse_config("").unwrap(), ProxyConfig::default());
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[listener]\nport = \"eighty\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = read_config(Path::new("/nonexistent/argon-proxy.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/argon-proxy.toml"));
    }

    #[test]
    fn test_validation_message_joins_errors() {
        let err = ConfigError::Validation(vec![
            ValidationError::EmptyAddress,
            ValidationError::ZeroPort,
        ]);
        assert_eq!(
            err.to_string(),
            "validation failed: listener.address must not be empty, listener.port must not be 0"
        );
    }
}
