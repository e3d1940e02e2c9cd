//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees syntactically.
//! Validation is a pure function and returns all errors, not just the first.

use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic configuration error.
#[derive(Debug)]
pub enum ValidationError {
    InvalidProviderUrl { url: String, reason: String },
    ZeroRefreshInterval,
    ZeroFetchTimeout,
    EmptyAppName,
    EmptyFlagName,
    ZeroGracePeriod,
    InvalidMetricsAddress(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidProviderUrl { url, reason } => {
                write!(f, "provider.url {:?} is not a valid URL: {}", url, reason)
            }
            ValidationError::ZeroRefreshInterval => {
                write!(f, "provider.refresh_interval_secs must be positive")
            }
            ValidationError::ZeroFetchTimeout => {
                write!(f, "provider.fetch_timeout_secs must be positive")
            }
            ValidationError::EmptyAppName => write!(f, "provider.app_name must not be empty"),
            ValidationError::EmptyFlagName => write!(f, "message.flag_name must not be empty"),
            ValidationError::ZeroGracePeriod => {
                write!(f, "lifecycle.grace_period_secs must be positive")
            }
            ValidationError::InvalidMetricsAddress(addr) => {
                write!(f, "observability.metrics_address {:?} is not a socket address", addr)
            }
        }
    }
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = Url::parse(&config.provider.url) {
        errors.push(ValidationError::InvalidProviderUrl {
            url: config.provider.url.clone(),
            reason: e.to_string(),
        });
    }
    if config.provider.refresh_interval_secs == 0 {
        errors.push(ValidationError::ZeroRefreshInterval);
    }
    if config.provider.fetch_timeout_secs == 0 {
        errors.push(ValidationError::ZeroFetchTimeout);
    }
    if config.provider.app_name.trim().is_empty() {
        errors.push(ValidationError::EmptyAppName);
    }
    if config.message.flag_name.trim().is_empty() {
        errors.push(ValidationError::EmptyFlagName);
    }
    if config.lifecycle.grace_period_secs == 0 {
        errors.push(ValidationError::ZeroGracePeriod);
    }
    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
