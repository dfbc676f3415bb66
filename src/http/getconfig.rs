//! Sample configuration file server.

use axum::{
    extract::Path,
    http::header,
    response::{IntoResponse, Response},
};

use crate::proxy::error::ProxyError;
use crate::samples;

/// `GET /getconfig/`: list the embedded sample names.
pub async fn list_samples() -> Response {
    let mut text = String::from("Available configuration files:\n\n");
    for name in samples::names() {
        text.push_str("- ");
        text.push_str(name);
        text.push('\n');
    }
    text.push_str("\nUsage: GET /getconfig/{filename}\n");

    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response()
}

/// `GET /getconfig/{name}`.
pub async fn get_sample(Path(name): Path<String>) -> Result<Response, ProxyError> {
    let Some(sample) = samples::find(&name) else {
        tracing::debug!(name = %name, "Sample configuration not found");
        return Err(ProxyError::ConfigNotFound);
    };

    tracing::debug!(name = %name, "Serving sample configuration");
    Ok((
        [(header::CONTENT_TYPE, samples::content_type(sample.name))],
        sample.contents,
    )
        .into_response())
}
