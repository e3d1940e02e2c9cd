//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers: / (flag-gated content), /health (fixed)
//! ```

pub mod request;
pub mod server;

pub use request::MakeRequestUuid;
pub use server::HttpServer;
