//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → proxy::forward (resolve target, dispatch upstream)
//!     → response.rs (relay headers and body)
//!     → middleware/cors.rs (access-control headers on every response)
//!     → Send to client
//! ```

pub mod getconfig;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;
pub mod usage;

pub use request::{request_id, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
