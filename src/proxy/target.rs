//! Target resolution and URL normalization.
//!
//! # Responsibilities
//! - Find the target in the raw query (`target=`) or the `/proxy/` path suffix
//! - Percent-decode it and default the scheme to https
//! - Re-attach the remaining inbound query parameters
//!
//! # Design Decisions
//! - The query is scanned as raw text, not parsed. The target value ends at
//!   the first `&`, so an unencoded `&` inside it splits the target.
//! - A query-form target takes precedence over a path-form one.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

use crate::proxy::error::ProxyError;

pub const PROXY_PREFIX: &str = "/proxy/";
const TARGET_PARAM: &str = "target=";

/// Extract the raw (possibly still encoded) target.
///
/// An empty result means no target was given.
pub fn resolve_target<'a>(path: &'a str, raw_query: Option<&'a str>) -> &'a str {
    let from_query = raw_query.and_then(|query| {
        query
            .split('&')
            .find_map(|segment| segment.strip_prefix(TARGET_PARAM))
    });

    match from_query {
        Some(target) => target,
        None => path.strip_prefix(PROXY_PREFIX).unwrap_or(""),
    }
}

/// The inbound query with every `target=` segment and empty segment removed.
pub fn additional_params(raw_query: Option<&str>) -> String {
    raw_query
        .unwrap_or("")
        .split('&')
        .filter(|segment| !segment.is_empty() && !segment.starts_with(TARGET_PARAM))
        .collect::<Vec<_>>()
        .join("&")
}

/// Query-unescape a target: `+` is a space, every `%` must start a valid
/// two-digit hex escape, and the result must be UTF-8.
pub fn decode_target(raw: &str) -> Result<String, ProxyError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(ProxyError::InvalidEncoding);
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| ProxyError::InvalidEncoding)
}

/// Prepend `https://` unless the URL already names http or https.
pub fn ensure_scheme(url: String) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url
    } else {
        format!("https://{url}")
    }
}

/// Append extra query parameters, joining with `&` if the URL already has a
/// query string and `?` otherwise.
pub fn merge_query(mut url: String, extra: &str) -> String {
    if extra.is_empty() {
        return url;
    }
    url.push(if url.contains('?') { '&' } else { '?' });
    url.push_str(extra);
    url
}

/// Turn a raw target into the final absolute URL to dispatch.
pub fn normalize(raw_target: &str, raw_query: Option<&str>) -> Result<String, ProxyError> {
    let decoded = ensure_scheme(decode_target(raw_target)?);
    Ok(merge_query(decoded, &additional_params(raw_query)))
}

/// Authority of an absolute URL, used as the outbound Host header.
///
/// Text between `://` and the next `/`, `?` or `#`, without userinfo.
pub fn host_authority(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let end = rest.find(|c: char| matches!(c, '/' | '?' | '#')).unwrap_or(rest.len());
    let authority = &rest[..end];
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    (!host.is_empty()).then_some(host)
}
