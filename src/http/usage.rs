//! Plain-text usage help.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// Which examples to include in the help text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageSection {
    Proxy,
    Config,
    All,
}

pub fn usage_text(section: UsageSection) -> String {
    let mut text = String::from("CORS Proxy Usage:\n");
    text.push_str("GET /proxy/{url} - Proxy to the specified URL\n");
    text.push_str("GET /proxy/?target={url} - Proxy to the specified URL (query form)\n");
    text.push_str("GET /getconfig/{filename} - Get embedded configuration file\n");

    if matches!(section, UsageSection::Proxy | UsageSection::All) {
        text.push_str("\nProxy Examples:\n");
        text.push_str("  - GET /proxy/https://api.example.com/data\n");
        text.push_str("  - GET /proxy/?target=https://api.example.com/data\n");
        text.push_str("  - GET /proxy/?target=https%3A%2F%2Fapi.example.com%2Fsearch%3Fq%3Drust&page=2\n");
    }

    if matches!(section, UsageSection::Config | UsageSection::All) {
        text.push_str("\nConfig Examples:\n");
        text.push_str("  - GET /getconfig/\n");
        text.push_str("  - GET /getconfig/nginx.conf\n");
    }

    text
}

pub fn usage_response(section: UsageSection) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        usage_text(section),
    )
        .into_response()
}

/// `GET /`.
pub async fn root_handler() -> Response {
    usage_response(UsageSection::All)
}

/// Any path without a route.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found\n").into_response()
}
