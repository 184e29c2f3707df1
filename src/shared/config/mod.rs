//! Application configuration module
//!
//! Provides the validated configuration values the portal client runs with.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

/// Default backend base URL
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000/api";

/// Default token verification cadence (5 minutes)
pub const DEFAULT_VERIFY_INTERVAL: Duration = Duration::from_secs(300);

/// Default unread-notification poll cadence
pub const DEFAULT_UNREAD_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend base URL, without trailing slash
    pub api_base_url: String,
    /// How often the session token is re-verified
    pub verify_interval: Duration,
    /// How often the unread notification count is refreshed
    pub unread_poll_interval: Duration,
    /// Timeout applied to every backend request
    pub request_timeout: Duration,
    /// Location of the durable session store; `None` means the platform default
    pub storage_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            verify_interval: DEFAULT_VERIFY_INTERVAL,
            unread_poll_interval: DEFAULT_UNREAD_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            storage_path: None,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Parsed base URL; must be http(s) with a host
    pub fn api_base(&self) -> Result<Url, ConfigError> {
        let invalid = || ConfigError::InvalidUrl(self.api_base_url.clone());
        let url = Url::parse(&self.api_base_url).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(invalid());
        }
        Ok(url)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_base()?;
        if self.verify_interval.is_zero() {
            return Err(ConfigError::InvalidInterval("verify_interval"));
        }
        if self.unread_poll_interval.is_zero() {
            return Err(ConfigError::InvalidInterval("unread_poll_interval"));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidInterval("request_timeout"));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default, Clone)]
pub struct AppConfigBuilder {
    api_base_url: Option<String>,
    verify_interval: Option<Duration>,
    unread_poll_interval: Option<Duration>,
    request_timeout: Option<Duration>,
    storage_path: Option<PathBuf>,
}

impl AppConfigBuilder {
    /// Set the backend base URL
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    pub fn verify_interval(mut self, interval: Duration) -> Self {
        self.verify_interval = Some(interval);
        self
    }

    pub fn unread_poll_interval(mut self, interval: Duration) -> Self {
        self.unread_poll_interval = Some(interval);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            api_base_url: self
                .api_base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            verify_interval: self.verify_interval.unwrap_or(defaults.verify_interval),
            unread_poll_interval: self
                .unread_poll_interval
                .unwrap_or(defaults.unread_poll_interval),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            storage_path: self.storage_path,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("interval must be greater than zero: {0}")]
    InvalidInterval(&'static str),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = AppConfig::builder().build().unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.verify_interval, Duration::from_secs(300));
        assert_eq!(config.unread_poll_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let config = AppConfig::builder()
            .api_base_url("https://portal.example.org/api/")
            .build()
            .unwrap();
        assert_eq!(config.api_base_url, "https://portal.example.org/api");
    }

    #[test]
    fn test_builder_rejects_bad_scheme() {
        let err = AppConfig::builder().api_base_url("ftp://nope").build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));
    }

    #[test]
    fn test_builder_rejects_unparseable_url() {
        for bad in ["https://a.b:notaport/api", "https://a.b:99999", "https://ex[ample.com", "http://"] {
            let err = AppConfig::builder().api_base_url(bad).build().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidUrl(_)), "{bad} was accepted");
        }
    }

    #[test]
    fn test_builder_rejects_zero_interval() {
        let err = AppConfig::builder()
            .verify_interval(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInterval("verify_interval")));
    }
}
