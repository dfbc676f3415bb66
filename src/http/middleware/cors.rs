//! CORS annotation.
//!
//! Every response leaving the proxy carries the access-control headers.
//! Proxied responses and preflights are annotated by their handlers; the
//! middleware covers everything else (usage text, sample files, errors, 404s).

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::server::AppState;

pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS, PUT, DELETE, HEAD, PATCH";
const DEFAULT_ALLOW_HEADERS: &str = "*";
const PREFLIGHT_ALLOW_HEADERS: &str = "Content-Type, Authorization, X-Requested-With";
pub const PREFLIGHT_MAX_AGE_SECS: u32 = 86_400;

/// Configured allow-origin policy.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_origin: HeaderValue,
}

impl CorsPolicy {
    pub fn new(allow_origin: &str) -> Result<Self, header::InvalidHeaderValue> {
        Ok(Self {
            allow_origin: HeaderValue::from_str(allow_origin)?,
        })
    }

    fn is_wildcard(&self) -> bool {
        self.allow_origin == "*"
    }

    /// `Access-Control-Allow-Origin` for a request.
    ///
    /// The request's Origin is echoed when the policy is `*` or names it
    /// exactly, which lets browsers send credentials. Otherwise the
    /// configured literal is returned.
    pub fn allow_origin_for(&self, origin: Option<&HeaderValue>) -> HeaderValue {
        match origin {
            Some(origin)
                if !origin.is_empty() && (self.is_wildcard() || *origin == self.allow_origin) =>
            {
                origin.clone()
            }
            _ => self.allow_origin.clone(),
        }
    }

    /// Set the standard access-control headers on `response`.
    pub fn annotate(&self, request: &HeaderMap, response: &mut HeaderMap) {
        response.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            self.allow_origin_for(request.get(header::ORIGIN)),
        );
        response.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        response.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(DEFAULT_ALLOW_HEADERS),
        );
        response.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        response.insert(header::VARY, HeaderValue::from_static("Origin"));
    }

    /// Answer a preflight request. Always 204 with an empty body.
    pub fn preflight(&self, request: &HeaderMap) -> Response {
        let mut headers = HeaderMap::new();
        self.annotate(request, &mut headers);

        if let Some(method) = request
            .get(header::ACCESS_CONTROL_REQUEST_METHOD)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|m| !m.is_empty())
        {
            let listed = ALLOWED_METHODS
                .split(", ")
                .any(|allowed| allowed.eq_ignore_ascii_case(method));
            if !listed {
                if let Ok(value) = HeaderValue::from_str(&format!("{ALLOWED_METHODS}, {method}")) {
                    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, value);
                }
            }
        }

        let allow_headers = match request.get(header::ACCESS_CONTROL_REQUEST_HEADERS) {
            Some(requested) if !requested.is_empty() => requested.clone(),
            _ => HeaderValue::from_static(PREFLIGHT_ALLOW_HEADERS),
        };
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, allow_headers);
        headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from(PREFLIGHT_MAX_AGE_SECS));

        (StatusCode::NO_CONTENT, headers, Body::empty()).into_response()
    }
}

/// Annotate responses that were not annotated by their handler.
pub async fn cors_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let request_headers = request.headers().clone();
    let mut response = next.run(request).await;

    if !response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN) {
        state.cors.annotate(&request_headers, response.headers_mut());
    }
    response
}

/// True for requests that should be answered as a CORS preflight.
pub fn is_preflight(method: &Method) -> bool {
    method == Method::OPTIONS
}
