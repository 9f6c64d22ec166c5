//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, per-verb handlers)
//!     → request.rs (request ID)
//!     → forwarder (CSRF token, backend call)
//!     → response.rs (relay, error logging, metrics)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
