//! Configuration management for the client.

use docket_engine::ClientConfig;
use std::env;
use std::time::Duration;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credentials and API root
    pub client: ClientConfig,
    /// Timeout applied to every HTTP request
    pub timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let application_id =
            lookup("PARSE_APPLICATION_ID").ok_or(ConfigError::MissingApplicationId)?;

        let api_key = lookup("PARSE_REST_API_KEY").ok_or(ConfigError::MissingApiKey)?;

        let mut client = ClientConfig::new(application_id, api_key);
        if let Some(base_url) = lookup("PARSE_BASE_URL") {
            client = client.with_base_url(base_url);
        }

        let timeout_secs = lookup("DOCKET_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        Ok(Self {
            client,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PARSE_APPLICATION_ID environment variable is required")]
    MissingApplicationId,

    #[error("PARSE_REST_API_KEY environment variable is required")]
    MissingApiKey,

    #[error("Invalid DOCKET_TIMEOUT_SECS value")]
    InvalidTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_engine::DEFAULT_BASE_URL;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[
            ("PARSE_APPLICATION_ID", "app"),
            ("PARSE_REST_API_KEY", "key"),
        ]))
        .unwrap();

        assert_eq!(config.client.application_id, "app");
        assert_eq!(config.client.api_key, "key");
        assert_eq!(config.client.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PARSE_APPLICATION_ID", "app"),
            ("PARSE_REST_API_KEY", "key"),
            ("PARSE_BASE_URL", "http://localhost:1337/parse/"),
            ("DOCKET_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.client.base_url, "http://localhost:1337/parse");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_credentials() {
        let err = Config::from_lookup(lookup(&[("PARSE_REST_API_KEY", "key")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApplicationId));

        let err = Config::from_lookup(lookup(&[("PARSE_APPLICATION_ID", "app")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn invalid_timeout() {
        let err = Config::from_lookup(lookup(&[
            ("PARSE_APPLICATION_ID", "app"),
            ("PARSE_REST_API_KEY", "key"),
            ("DOCKET_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout));
    }
}
