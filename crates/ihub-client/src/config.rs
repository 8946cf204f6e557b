//! Configuration for the hub client.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use ihub_core::directory::RegistryDialect;
use ihub_core::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the hub HTTP client.
///
/// Each endpoint is either given explicitly or derived from `base_url`
/// (`providers`, `logs`, `retry`, `send` and `keys` below it).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ClientConfig {
    /// Base URL every endpoint defaults to.
    #[cfg_attr(feature = "config", arg(long, env = "IHUB_BASE_URL"))]
    #[serde(default)]
    pub base_url: Option<Url>,

    /// Provider registry endpoint.
    #[cfg_attr(feature = "config", arg(long, env = "IHUB_REGISTRY_URL"))]
    #[serde(default)]
    pub registry_url: Option<Url>,

    /// Message log endpoint.
    #[cfg_attr(feature = "config", arg(long, env = "IHUB_LOGS_URL"))]
    #[serde(default)]
    pub logs_url: Option<Url>,

    /// Manual retry endpoint.
    #[cfg_attr(feature = "config", arg(long, env = "IHUB_RETRY_URL"))]
    #[serde(default)]
    pub retry_url: Option<Url>,

    /// Test dispatch endpoint.
    #[cfg_attr(feature = "config", arg(long, env = "IHUB_SEND_URL"))]
    #[serde(default)]
    pub send_url: Option<Url>,

    /// API key listing endpoint.
    #[cfg_attr(feature = "config", arg(long, env = "IHUB_KEYS_URL"))]
    #[serde(default)]
    pub keys_url: Option<Url>,

    /// Static key sent as `X-Api-Key` with every request.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "IHUB_API_KEY", hide_env_values = true, default_value = "")
    )]
    #[serde(default)]
    pub api_key: String,

    /// HTTP timeout in seconds; 0 selects the default of 30.
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "IHUB_HTTP_TIMEOUT", default_value_t = 30)
    )]
    #[serde(default)]
    pub timeout_secs: u64,

    /// User-Agent header to send with requests.
    #[cfg_attr(feature = "config", arg(long, env = "IHUB_USER_AGENT"))]
    #[serde(default)]
    pub user_agent: Option<String>,

    /// HTTP verbs the registry uses for create and update.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "IHUB_REGISTRY_DIALECT", default_value = "rest")
    )]
    #[serde(default)]
    pub dialect: RegistryDialect,
}

/// Resolved endpoint URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Endpoints {
    pub registry: Url,
    pub logs: Url,
    pub retry: Url,
    pub send: Url,
    pub keys: Url,
}

impl ClientConfig {
    /// Creates a configuration deriving every endpoint from `base_url`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `base_url` is not a valid URL.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|error| {
            Error::configuration()
                .with_message(format!("invalid base URL '{base_url}'"))
                .with_source(error)
        })?;

        Ok(Self {
            base_url: Some(base_url),
            api_key: api_key.into(),
            ..Self::default()
        })
    }

    /// Sets the registry dialect.
    pub fn with_dialect(mut self, dialect: RegistryDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Sets the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout_secs == 0 {
            DEFAULT_TIMEOUT
        } else {
            Duration::from_secs(self.timeout_secs)
        }
    }

    /// Returns the effective user agent, using default if empty.
    pub fn effective_user_agent(&self) -> String {
        match &self.user_agent {
            Some(user_agent) if !user_agent.is_empty() => user_agent.clone(),
            _ => format!("ihub/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Checks the API key and resolves every endpoint.
    pub(crate) fn endpoints(&self) -> Result<Endpoints> {
        if self.api_key.trim().is_empty() {
            return Err(Error::configuration().with_message("API key is empty"));
        }

        Ok(Endpoints {
            registry: self.endpoint(self.registry_url.as_ref(), "providers")?,
            logs: self.endpoint(self.logs_url.as_ref(), "logs")?,
            retry: self.endpoint(self.retry_url.as_ref(), "retry")?,
            send: self.endpoint(self.send_url.as_ref(), "send")?,
            keys: self.endpoint(self.keys_url.as_ref(), "keys")?,
        })
    }

    fn endpoint(&self, explicit: Option<&Url>, path: &str) -> Result<Url> {
        if let Some(url) = explicit {
            return Ok(url.clone());
        }

        let Some(base_url) = &self.base_url else {
            return Err(Error::configuration()
                .with_message(format!("no URL for the {path} endpoint and no base URL")));
        };

        // Without a trailing slash `join` would replace the last segment.
        let mut base_url = base_url.clone();
        if !base_url.path().ends_with('/') {
            let directory = format!("{}/", base_url.path());
            base_url.set_path(&directory);
        }

        base_url.join(path).map_err(|error| {
            Error::configuration()
                .with_message(format!("cannot derive the {path} endpoint"))
                .with_source(error)
        })
    }
}

#[cfg(test)]
mod tests {
    use ihub_core::ErrorKind;

    use super::*;

    #[test]
    fn endpoints_derive_from_base() {
        let config = ClientConfig::new("http://127.0.0.1:8080/api", "key").unwrap();
        let endpoints = config.endpoints().unwrap();

        assert_eq!(endpoints.registry.as_str(), "http://127.0.0.1:8080/api/providers");
        assert_eq!(endpoints.keys.as_str(), "http://127.0.0.1:8080/api/keys");
    }

    #[test]
    fn explicit_endpoint_wins() {
        let mut config = ClientConfig::new("http://127.0.0.1:8080/", "key").unwrap();
        config.logs_url = Some(Url::parse("https://logs.example.com/fn/3f1b").unwrap());

        let endpoints = config.endpoints().unwrap();
        assert_eq!(endpoints.logs.as_str(), "https://logs.example.com/fn/3f1b");
        assert_eq!(endpoints.retry.as_str(), "http://127.0.0.1:8080/retry");
    }

    #[test]
    fn missing_key_or_url_is_a_configuration_error() {
        let config = ClientConfig::new("http://127.0.0.1:8080/", " ").unwrap();
        assert_eq!(config.endpoints().unwrap_err().kind(), ErrorKind::Configuration);

        let config = ClientConfig {
            api_key: "key".to_owned(),
            ..ClientConfig::default()
        };
        assert_eq!(config.endpoints().unwrap_err().kind(), ErrorKind::Configuration);
    }

    #[test]
    fn effective_values_fall_back_to_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.effective_timeout(), DEFAULT_TIMEOUT);
        assert!(config.effective_user_agent().starts_with("ihub/"));

        let config = config.with_timeout(Duration::from_secs(5)).with_user_agent("ops");
        assert_eq!(config.effective_timeout(), Duration::from_secs(5));
        assert_eq!(config.effective_user_agent(), "ops");
    }
}
