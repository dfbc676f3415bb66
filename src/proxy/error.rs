//! Proxy error types and their HTTP mapping.

use std::error::Error as StdError;
use std::time::Duration;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failures of the forwarding pipeline and the sample file server.
///
/// Each kind is converted into a plain-text response where it happens.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Invalid URL encoding in target")]
    InvalidEncoding,

    #[error("Error creating proxy request")]
    RequestConstruction(#[source] reqwest::Error),

    #[error("Error proxying request: {0}")]
    UpstreamUnreachable(String),

    #[error("Upstream did not respond within {}s", .0.as_secs())]
    UpstreamTimeout(Duration),

    #[error("Configuration file not found")]
    ConfigNotFound,
}

impl ProxyError {
    /// Dispatch failure, keeping the whole cause chain in the message.
    pub fn unreachable(err: &reqwest::Error) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::UpstreamUnreachable(message)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidEncoding => StatusCode::BAD_REQUEST,
            Self::RequestConstruction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            Self::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::ConfigNotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("{self}\n"),
        )
            .into_response()
    }
}
