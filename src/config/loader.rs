//! Configuration loading.
//!
//! Resolution order: schema defaults, then an optional TOML file, then
//! environment variable overrides. The environment surface matches what the
//! deployment manifests set (`PORT`, `UNLEASH_URL`, `UNLEASH_API_TOKEN`, ...).

use std::env;
use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env(String),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env(e) => write!(f, "Environment error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration.
///
/// With no file path, starts from defaults; environment variables apply on
/// top in both cases.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = fs::read_to_string(p).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => AppConfig::default(),
    };

    apply_overrides(&mut config, |name| env::var(name).ok())?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides from the given lookup.
///
/// Takes the lookup as a parameter so tests can drive it without touching
/// process-global state.
fn apply_overrides<F>(config: &mut AppConfig, get: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = get("PORT") {
        config.server.port = v
            .parse()
            .map_err(|_| ConfigError::Env(format!("PORT must be a port number, got {:?}", v)))?;
    }
    if let Some(v) = get("BIND_ADDRESS") {
        config.server.bind_address = v;
    }
    if let Some(v) = get("UNLEASH_URL") {
        config.provider.url = v;
    }
    if let Some(v) = get("UNLEASH_APP_NAME") {
        config.provider.app_name = v;
    }
    if let Some(v) = get("UNLEASH_ENVIRONMENT") {
        config.provider.environment = v;
    }
    if let Some(v) = get("UNLEASH_API_TOKEN") {
        config.provider.api_token = v;
    }
    if let Some(v) = get("UNLEASH_REFRESH_INTERVAL") {
        config.provider.refresh_interval_secs = v.parse().map_err(|_| {
            ConfigError::Env(format!(
                "UNLEASH_REFRESH_INTERVAL must be a number of seconds, got {:?}",
                v
            ))
        })?;
    }
    if let Some(v) = get("BETA_FALLBACK_ENABLED") {
        config.fallback.beta_enabled = parse_bool(&v).ok_or_else(|| {
            ConfigError::Env(format!("BETA_FALLBACK_ENABLED must be a boolean, got {:?}", v))
        })?;
    }
    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_survive_empty_environment() {
        let mut config = AppConfig::default();
        apply_overrides(&mut config, lookup(&[])).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.provider.url, "http://unleash-server:4242/api/");
        assert!(!config.fallback.beta_enabled);
    }

    #[test]
    fn environment_overrides_apply() {
        let mut config = AppConfig::default();
        apply_overrides(
            &mut config,
            lookup(&[
                ("PORT", "8080"),
                ("UNLEASH_URL", "http://localhost:4242/api/"),
                ("UNLEASH_API_TOKEN", "secret"),
                ("UNLEASH_REFRESH_INTERVAL", "15"),
                ("BETA_FALLBACK_ENABLED", "true"),
            ]),
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.provider.url, "http://localhost:4242/api/");
        assert_eq!(config.provider.api_token, "secret");
        assert_eq!(config.provider.refresh_interval_secs, 15);
        assert!(config.fallback.beta_enabled);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut config = AppConfig::default();
        let err = apply_overrides(&mut config, lookup(&[("PORT", "not-a-port")]))
            .expect_err("bad PORT must fail");
        assert!(matches!(err, ConfigError::Env(_)));
    }

    #[test]
    fn fallback_accepts_common_boolean_spellings() {
        for (raw, expected) in [("1", true), ("YES", true), ("off", false), ("0", false)] {
            let mut config = AppConfig::default();
            apply_overrides(&mut config, lookup(&[("BETA_FALLBACK_ENABLED", raw)])).unwrap();
            assert_eq!(config.fallback.beta_enabled, expected, "input {:?}", raw);
        }
    }
}
