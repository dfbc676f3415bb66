//! Response relay.
//!
//! # Responsibilities
//! - Annotate the upstream response with our CORS headers
//! - Copy upstream headers, minus hop-by-hop and Access-Control-*
//! - Stream the upstream body to the client
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Status and headers are committed before the body; a body failure on
//!   either side can only be logged, and the connection is closed

use std::fmt::Display;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use axum::{
    body::Body,
    http::{request::Parts, HeaderMap, Method, StatusCode},
    response::Response,
};
use futures_util::Stream;

use crate::http::middleware::cors::CorsPolicy;
use crate::security::headers::append_response_headers;

/// Convert an upstream response into the client response.
pub fn relay(cors: &CorsPolicy, request: &Parts, upstream: reqwest::Response) -> Response {
    let status = upstream.status();

    let mut headers = HeaderMap::new();
    cors.annotate(&request.headers, &mut headers);
    append_response_headers(upstream.headers(), &mut headers);

    let url = upstream.url().to_string();
    let body = RelayBody {
        inner: Box::pin(upstream.bytes_stream()),
        url,
        // hyper never polls these bodies.
        done: request.method == Method::HEAD || !carries_body(status),
    };

    let mut response = Response::new(Body::from_stream(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

fn carries_body(status: StatusCode) -> bool {
    !(status.is_informational() || status == StatusCode::NO_CONTENT || status == StatusCode::NOT_MODIFIED)
}

/// Upstream body stream that logs how a relay ended early.
///
/// Upstream read errors are logged as they surface. A client that goes away
/// makes hyper drop the stream before its end, which is logged on drop.
struct RelayBody<S> {
    inner: S,
    url: String,
    done: bool,
}

impl<S, T, E> Stream for RelayBody<S>
where
    S: Stream<Item = Result<T, E>> + Unpin,
    E: Display,
{
    type Item = Result<T, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let item = ready!(Pin::new(&mut self.inner).poll_next(cx));
        match &item {
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                tracing::error!(url = %self.url, error = %e, "Error copying response body");
                self.done = true;
            }
            None => self.done = true,
        }
        Poll::Ready(item)
    }
}

impl<S> Drop for RelayBody<S> {
    fn drop(&mut self) {
        if !self.done {
            tracing::error!(url = %self.url, "Client disconnected before response body completed");
        }
    }
}
