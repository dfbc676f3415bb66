//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (drop hop-by-hop and deny-listed headers)
//!     → headers.rs (derive client IP, inject X-Real-IP in trust-proxy mode)
//!     → Outbound request
//!
//! Upstream response:
//!     → headers.rs (drop hop-by-hop and Access-Control-* headers)
//!     → CORS annotation
//! ```
//!
//! # Design Decisions
//! - No trust in client-supplied forwarding headers unless configured

pub mod headers;
