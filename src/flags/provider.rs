//! Flag provider HTTP client.
//!
//! # Responsibilities
//! - Build the `client/features` endpoint from the configured base URL
//! - Attach auth and application identification headers
//! - Fetch and decode the toggle listing with a bounded timeout

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::ProviderConfig;
use crate::flags::snapshot::{ClientFeatures, FlagSnapshot};

/// Errors from the provider boundary. None of these escape the flag client.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("invalid provider configuration: {0}")]
    Config(String),

    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    Status(StatusCode),
}

/// HTTP client for the remote flag provider.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl ProviderClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let endpoint = build_endpoint(&config.url, &config.environment)
            .map_err(|e| ProviderError::Config(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&config.api_token)
                .map_err(|_| ProviderError::Config("api_token is not a valid header value".into()))?,
        );
        headers.insert(
            HeaderName::from_static("unleash-appname"),
            HeaderValue::from_str(&config.app_name)
                .map_err(|_| ProviderError::Config("app_name is not a valid header value".into()))?,
        );

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self { http, endpoint })
    }

    /// Fetch the full toggle listing and build a snapshot from it.
    pub async fn fetch_features(&self) -> Result<FlagSnapshot, ProviderError> {
        let response = self.http.get(self.endpoint.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }

        let doc: ClientFeatures = response.json().await?;
        Ok(FlagSnapshot::from_features(doc))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn build_endpoint(base: &str, environment: &str) -> Result<Url, url::ParseError> {
    // Url::join treats a base without a trailing slash as a file segment.
    let mut base = base.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let mut endpoint = Url::parse(&base)?.join("client/features")?;
    if !environment.is_empty() {
        endpoint
            .query_pairs_mut()
            .append_pair("environment", environment);
    }
    Ok(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_with_and_without_trailing_slash() {
        let a = build_endpoint("http://unleash-server:4242/api/", "").unwrap();
        let b = build_endpoint("http://unleash-server:4242/api", "").unwrap();
        assert_eq!(a.as_str(), "http://unleash-server:4242/api/client/features");
        assert_eq!(a, b);
    }

    #[test]
    fn environment_is_sent_as_query() {
        let url = build_endpoint("http://localhost:4242/api/", "development").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:4242/api/client/features?environment=development"
        );
    }

    #[test]
    fn bad_token_is_a_config_error() {
        let config = ProviderConfig {
            api_token: "line\nbreak".to_string(),
            ..ProviderConfig::default()
        };
        assert!(matches!(
            ProviderClient::new(&config),
            Err(ProviderError::Config(_))
        ));
    }
}
