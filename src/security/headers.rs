//! Header filtering and client address derivation.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers in both directions
//! - Drop headers that must not reach the upstream (Host, X-Forwarded-Host, ...)
//! - Derive the client IP, honouring X-Forwarded-For only in trust-proxy mode
//!
//! # Design Decisions
//! - Allow-by-default: any header not on the deny-list is forwarded, so new
//!   headers pass through without code changes
//! - Never trust existing X-Forwarded-* from untrusted sources

use std::net::SocketAddr;

use axum::http::{HeaderMap, HeaderName, HeaderValue};

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
pub const X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");

/// Connection-scoped headers that never cross the proxy.
const HOP_BY_HOP: [&str; 7] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "te",
    "trailer",
    "upgrade",
];

/// Request headers the upstream must never see from the client.
const REQUEST_DENYLIST: [&str; 4] = [
    "host",
    "x-forwarded-host",
    "x-forwarded-proto",
    "content-length",
];

/// Headers injected by a fronting nginx for its own use.
const PRIVATE_PREFIX: &str = "x-nginx";

const CORS_PREFIX: &str = "access-control-";

// HeaderName::as_str is always lowercase.

pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

/// Returns true if a request header should not be forwarded upstream.
pub fn should_skip_request_header(name: &HeaderName) -> bool {
    let name = name.as_str();
    HOP_BY_HOP.contains(&name) || REQUEST_DENYLIST.contains(&name) || name.starts_with(PRIVATE_PREFIX)
}

/// Returns true if an upstream response header should not be relayed.
///
/// Upstream CORS headers would conflict with our own.
pub fn should_skip_response_header(name: &HeaderName) -> bool {
    is_hop_by_hop(name) || name.as_str().starts_with(CORS_PREFIX)
}

/// Copy the forwardable subset of the inbound headers, keeping every value
/// of multi-valued headers.
pub fn forwardable_request_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if !should_skip_request_header(name) {
            outbound.append(name.clone(), value.clone());
        }
    }
    outbound
}

/// Append the relayable upstream headers onto `target`.
pub fn append_response_headers(upstream: &HeaderMap, target: &mut HeaderMap) {
    for (name, value) in upstream {
        if !should_skip_response_header(name) {
            target.append(name.clone(), value.clone());
        }
    }
}

/// Derive the originating client IP.
///
/// With `trust_proxy` the leftmost X-Forwarded-For entry wins, then
/// X-Real-IP. Otherwise only the connection peer is used.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> Option<String> {
    if trust_proxy {
        let forwarded = header_str(headers, &X_FORWARDED_FOR)
            .and_then(|list| list.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());
        if let Some(ip) = forwarded {
            return Some(ip.to_string());
        }

        if let Some(real_ip) = header_str(headers, &X_REAL_IP).filter(|ip| !ip.is_empty()) {
            return Some(real_ip.to_string());
        }
    }

    peer.map(|addr| addr.ip().to_string())
}

/// X-Real-IP value to inject on the outbound request, if any.
///
/// Only produced in trust-proxy mode when the caller sent a non-empty
/// X-Forwarded-For.
pub fn real_ip_header(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> Option<HeaderValue> {
    let forwarded = header_str(headers, &X_FORWARDED_FOR).is_some_and(|v| !v.is_empty());
    if !trust_proxy || !forwarded {
        return None;
    }
    client_ip(headers, peer, trust_proxy).and_then(|ip| HeaderValue::from_str(&ip).ok())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
