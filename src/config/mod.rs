//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! schema defaults
//!     → loader.rs (optional TOML file, then env var overrides)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared with subsystems at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults so the service boots with zero configuration
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AppConfig, FallbackConfig, MessageConfig, ProviderConfig};
