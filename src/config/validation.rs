//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, port valid)
//! - Check the allowed origin can be emitted as a header value
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.address must not be empty")]
    EmptyAddress,

    #[error("listener.port must not be 0")]
    ZeroPort,

    #[error("cors.allow_origin {0:?} is not a valid header value")]
    InvalidAllowOrigin(String),

    #[error("timeouts.{0} must be greater than 0")]
    ZeroTimeout(&'static str),
}

/// Check a configuration, collecting every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.address.trim().is_empty() {
        errors.push(ValidationError::EmptyAddress);
    }
    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    let origin = &config.cors.allow_origin;
    if origin.is_empty() || HeaderValue::from_str(origin).is_err() {
        errors.push(ValidationError::InvalidAllowOrigin(origin.clone()));
    }

    let timeouts = [
        ("connect_secs", config.timeouts.connect_secs),
        ("response_secs", config.timeouts.response_secs),
        ("pool_idle_secs", config.timeouts.pool_idle_secs),
    ];
    for (name, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
