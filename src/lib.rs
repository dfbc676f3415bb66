//! CORS proxy library.
//!
//! Lets browser clients reach third-party APIs by relaying their requests
//! through a same-origin endpoint and annotating the responses with
//! access-control headers.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ http::server (request ID, tracing, CORS middleware)
//!                    │
//!                    ▼
//!               proxy::target   resolve + normalize the target URL
//!                    │
//!                    ▼
//!               proxy::forward  filtered headers, streamed body ──▶ Upstream
//!                    │                                                │
//!                    ▼                                                │
//!     Client ◀── http::response  CORS headers, upstream headers ◀─────┘
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod proxy;
pub mod samples;
pub mod security;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
