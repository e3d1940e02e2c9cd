//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files, and
//! every section has full defaults so a minimal (or empty) config is valid.

use serde::{Deserialize, Serialize};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings (bind address, port).
    pub server: ServerConfig,

    /// Remote flag provider settings.
    pub provider: ProviderConfig,

    /// Fallback policy applied while the flag client has no snapshot.
    pub fallback: FallbackConfig,

    /// Response message content and flag identity.
    pub message: MessageConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Shutdown behavior.
    pub lifecycle: LifecycleConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind (e.g., "0.0.0.0").
    pub bind_address: String,

    /// Listen port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Flag provider connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base API URL of the flag provider.
    pub url: String,

    /// Application name reported to the provider.
    pub app_name: String,

    /// Environment tag reported to the provider.
    pub environment: String,

    /// Value sent in the Authorization header.
    pub api_token: String,

    /// Interval between toggle refreshes in seconds.
    pub refresh_interval_secs: u64,

    /// Per-fetch request timeout in seconds.
    pub fetch_timeout_secs: u64,

    /// Cap on the failure backoff delay in seconds.
    pub max_backoff_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            url: "http://unleash-server:4242/api/".to_string(),
            app_name: "cicd-lab-app".to_string(),
            environment: "development".to_string(),
            api_token: "default-token".to_string(),
            refresh_interval_secs: 2,
            fetch_timeout_secs: 5,
            max_backoff_secs: 30,
        }
    }
}

/// Fallback policy for the content endpoint while no toggle snapshot has been
/// fetched yet. The endpoint stays reachable and this value stands in for the
/// flag until the client is ready.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FallbackConfig {
    /// Value assumed for the beta flag when the provider has never answered.
    pub beta_enabled: bool,
}

/// Response content and the identity of the flag that gates the suffix.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MessageConfig {
    /// Base welcome text, always served.
    pub base: String,

    /// Suffix appended when the beta flag is enabled.
    pub beta_suffix: String,

    /// Name of the flag queried per request.
    pub flag_name: String,

    /// Stable identifier placed in the evaluation context.
    pub context_user_id: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            base: "Welcome to the CI/CD Release Engineering Lab 🚀".to_string(),
            beta_suffix: "\n🧪 Beta Feature: Releasing smarter, one flag at a time."
                .to_string(),
            flag_name: "show-beta-banner".to_string(),
            context_user_id: "ci-cd-lab".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Maximum time to wait for the refresh task to stop on shutdown.
    pub grace_period_secs: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter, overridden by RUST_LOG.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "cicd_lab_app=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
