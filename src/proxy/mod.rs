//! Forwarding pipeline.
//!
//! # Data Flow
//! ```text
//! Inbound request (path, raw query)
//!     → target.rs (resolve raw target, decode, add scheme, merge params)
//!     → forward.rs (filtered headers, streamed body, single dispatch)
//!     → http::response (relay)
//!
//! Failures:
//!     → error.rs (ProxyError → plain-text status response)
//! ```
//!
//! # Design Decisions
//! - Stateless: nothing survives a request except the pooled client
//! - No retries; upstream HTTP errors are relayed, not mapped

pub mod error;
pub mod forward;
pub mod target;

pub use error::ProxyError;
