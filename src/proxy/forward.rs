//! Forwarding handler.
//!
//! # Pipeline
//! ```text
//! resolve target → normalize URL → build outbound request → dispatch → relay
//! ```
//!
//! Every request is dispatched exactly once. Nothing is retried or cached.

use std::net::SocketAddr;

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{ConnectInfo, Request, State},
    http::{header, request::Parts, HeaderValue},
    response::{IntoResponse, Response},
};
use futures_util::{future, stream, StreamExt};
use tokio::sync::oneshot;

use crate::http::middleware::cors::is_preflight;
use crate::http::request::request_id;
use crate::http::response::relay;
use crate::http::server::AppState;
use crate::http::usage::{usage_response, UsageSection};
use crate::proxy::error::ProxyError;
use crate::proxy::target;
use crate::security::headers::{self, X_REAL_IP};

/// Handler for every `/proxy` route.
pub async fn proxy_handler(State(state): State<AppState>, request: Request) -> Response {
    if is_preflight(request.method()) {
        return state.cors.preflight(request.headers());
    }

    let request_id = request_id(request.headers()).to_string();
    let raw_target = target::resolve_target(request.uri().path(), request.uri().query()).to_string();

    if raw_target.is_empty() {
        tracing::debug!(
            request_id = %request_id,
            query = request.uri().query().unwrap_or(""),
            "No target given, showing usage"
        );
        return usage_response(UsageSection::Proxy);
    }

    tracing::debug!(request_id = %request_id, raw_target = %raw_target, "Target resolved");

    match forward(&state, request, &raw_target, &request_id).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Proxy request failed");
            e.into_response()
        }
    }
}

async fn forward(
    state: &AppState,
    request: Request,
    raw_target: &str,
    request_id: &str,
) -> Result<Response, ProxyError> {
    let final_url = target::normalize(raw_target, request.uri().query())?;
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let (parts, body) = request.into_parts();
    let client_ip = headers::client_ip(&parts.headers, peer, state.trust_proxy);

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        url = %final_url,
        client_ip = client_ip.as_deref().unwrap_or("unknown"),
        "Forwarding request"
    );

    let outbound = build_outbound(state, &parts, body, &final_url, peer)?;
    let upstream = dispatch(state, outbound).await?;

    tracing::debug!(
        request_id = %request_id,
        status = upstream.status().as_u16(),
        url = %final_url,
        "Upstream responded"
    );

    Ok(relay(&state.cors, &parts, upstream))
}

/// The single outbound request for one inbound request.
#[derive(Debug)]
pub struct Outbound {
    pub request: reqwest::Request,
    /// Fires once a streamed body has been handed to the upstream in full.
    /// `None` when there is no body to send.
    pub upload_done: Option<oneshot::Receiver<()>>,
}

/// Build the single outbound request for `final_url`.
///
/// Method and headers come from the inbound request (minus the deny-list);
/// the body is streamed through without buffering.
pub fn build_outbound(
    state: &AppState,
    parts: &Parts,
    body: Body,
    final_url: &str,
    peer: Option<SocketAddr>,
) -> Result<Outbound, ProxyError> {
    let mut outbound_headers = headers::forwardable_request_headers(&parts.headers);

    if let Some(real_ip) = headers::real_ip_header(&parts.headers, peer, state.trust_proxy) {
        outbound_headers.insert(X_REAL_IP, real_ip);
    }

    if let Some(host) = target::host_authority(final_url).and_then(|h| HeaderValue::from_str(h).ok()) {
        outbound_headers.insert(header::HOST, host);
    }

    let builder = state
        .client
        .request(parts.method.clone(), final_url)
        .headers(outbound_headers);

    // An empty inbound body must not turn into a chunked upload.
    let (builder, upload_done) = if body.size_hint().exact() == Some(0) {
        (builder, None)
    } else {
        let (done_tx, done_rx) = oneshot::channel();
        let streamed = body
            .into_data_stream()
            .map(Some)
            .chain(stream::once(async move {
                let _ = done_tx.send(());
                None::<Result<Bytes, axum::Error>>
            }))
            .filter_map(future::ready);
        (builder.body(reqwest::Body::wrap_stream(streamed)), Some(done_rx))
    };

    let request = builder.build().map_err(ProxyError::RequestConstruction)?;
    Ok(Outbound { request, upload_done })
}

/// Send the request upstream. Any HTTP response counts as success.
///
/// The response timeout bounds only the wait for response headers: its
/// clock starts once the request body has been sent, so slow uploads are
/// never cut off.
async fn dispatch(state: &AppState, outbound: Outbound) -> Result<reqwest::Response, ProxyError> {
    let Outbound { request, upload_done } = outbound;
    let timeout = state.response_timeout;

    let headers_deadline = async move {
        if let Some(upload_done) = upload_done {
            // A dropped sender means the upload ended early; start the clock.
            let _ = upload_done.await;
        }
        tokio::time::sleep(timeout).await;
    };

    tokio::select! {
        result = state.client.execute(request) => result.map_err(|e| ProxyError::unreachable(&e)),
        () = headers_deadline => Err(ProxyError::UpstreamTimeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;
    use crate::http::server::HttpServer;
    use axum::http::{Method, Request as HttpRequest};

    fn state(trust_proxy: bool) -> AppState {
        let mut config = ProxyConfig::default();
        config.forwarding.trust_proxy = trust_proxy;
        HttpServer::new(config).unwrap().state()
    }

    fn parts(request: HttpRequest<Body>) -> (Parts, Body) {
        request.into_parts()
    }

    #[tokio::test]
    async fn test_build_outbound_filters_headers_and_sets_host() {
        let (parts, body) = parts(
            HttpRequest::builder()
                .method(Method::POST)
                .uri("/proxy/https://api.example.com/v1/items")
                .header("host", "proxy.local:8080")
                .header("x-forwarded-host", "proxy.local")
                .header("x-forwarded-proto", "https")
                .header("content-length", "5")
                .header("connection", "keep-alive")
                .header("x-nginx-request", "abc")
                .header("authorization", "Bearer token")
                .body(Body::from("hello"))
                .unwrap(),
        );

        let outbound = build_outbound(
            &state(false),
            &parts,
            body,
            "https://api.example.com/v1/items",
            None,
        )
        .unwrap();
        assert!(outbound.upload_done.is_some());
        let outbound = outbound.request;

        assert_eq!(outbound.method(), Method::POST);
        assert_eq!(outbound.url().as_str(), "https://api.example.com/v1/items");
        let headers = outbound.headers();
        assert_eq!(headers["host"], "api.example.com");
        assert_eq!(headers["authorization"], "Bearer token");
        for denied in [
            "x-forwarded-host",
            "x-forwarded-proto",
            "content-length",
            "connection",
            "x-nginx-request",
        ] {
            assert!(!headers.contains_key(denied), "{denied} leaked");
        }
        assert!(outbound.body().is_some());
    }

    #[tokio::test]
    async fn test_build_outbound_empty_body() {
        let (parts, body) = parts(
            HttpRequest::builder()
                .uri("/proxy/api.example.com")
                .body(Body::empty())
                .unwrap(),
        );
        let outbound = build_outbound(&state(false), &parts, body, "https://api.example.com", None).unwrap();
        assert!(outbound.request.body().is_none());
        assert!(outbound.upload_done.is_none());
    }

    #[tokio::test]
    async fn test_build_outbound_real_ip_only_when_trusted() {
        let peer: SocketAddr = "192.0.2.1:4000".parse().unwrap();
        let request = || {
            HttpRequest::builder()
                .uri("/proxy/api.example.com")
                .header("x-forwarded-for", "203.0.113.9, 10.0.0.2")
                .body(Body::empty())
                .unwrap()
        };

        let (parts, body) = request().into_parts();
        let trusted = build_outbound(&state(true), &parts, body, "https://api.example.com", Some(peer)).unwrap().request;
        assert_eq!(trusted.headers()["x-real-ip"], "203.0.113.9");

        let (parts, body) = request().into_parts();
        let untrusted = build_outbound(&state(false), &parts, body, "https://api.example.com", Some(peer)).unwrap().request;
        assert!(!untrusted.headers().contains_key("x-real-ip"));
    }

    #[tokio::test]
    async fn test_build_outbound_invalid_url() {
        let (parts, body) = parts(HttpRequest::builder().uri("/proxy/").body(Body::empty()).unwrap());
        let err = build_outbound(&state(false), &parts, body, "https://", None).unwrap_err();
        assert!(matches!(err, ProxyError::RequestConstruction(_)));
    }
}
