//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and middleware produce:
//!     → logging.rs (structured log events via tracing)
//!     → tower_http TraceLayer (per-request spans)
//!     → x-request-id (correlation across log lines)
//! ```

pub mod logging;
