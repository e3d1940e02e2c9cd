//! Flag-gated welcome service library.

pub mod config;
pub mod flags;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::AppConfig;
pub use flags::FlagClient;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
