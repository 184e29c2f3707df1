use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};

/// Directory name used under the platform config/data directories
const APP_DIR: &str = "society-portal";

const ENV_API_URL: &str = "PORTAL_API_URL";
const ENV_STORAGE_PATH: &str = "PORTAL_STORAGE_PATH";
const ENV_VERIFY_INTERVAL: &str = "PORTAL_VERIFY_INTERVAL_SECS";
const ENV_UNREAD_POLL: &str = "PORTAL_UNREAD_POLL_SECS";
const ENV_REQUEST_TIMEOUT: &str = "PORTAL_REQUEST_TIMEOUT_SECS";

/// Optional `config.toml` contents
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_base_url: Option<String>,
    pub verify_interval_secs: Option<u64>,
    pub unread_poll_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub storage_path: Option<PathBuf>,
}

impl FileConfig {
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Read the file if it exists; a missing file is not an error
    pub fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Client configuration: defaults, then `config.toml`, then environment.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self {
            app: builder.build()?,
        })
    }

    /// Load from the platform config file and process environment
    pub fn load() -> Result<Self, ConfigError> {
        let file = match Self::default_config_file() {
            Some(path) => {
                let file = FileConfig::read(&path)?;
                if file.is_some() {
                    tracing::info!("Loaded configuration from {}", path.display());
                }
                file
            }
            None => None,
        };
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// Layer a parsed file and an environment lookup over the defaults
    pub fn from_sources(
        file: Option<FileConfig>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = AppConfig::builder();

        if let Some(file) = file {
            if let Some(url) = file.api_base_url {
                builder = builder.api_base_url(url);
            }
            if let Some(secs) = file.verify_interval_secs {
                builder = builder.verify_interval(Duration::from_secs(secs));
            }
            if let Some(secs) = file.unread_poll_secs {
                builder = builder.unread_poll_interval(Duration::from_secs(secs));
            }
            if let Some(secs) = file.request_timeout_secs {
                builder = builder.request_timeout(Duration::from_secs(secs));
            }
            if let Some(path) = file.storage_path {
                builder = builder.storage_path(path);
            }
        }

        if let Some(url) = env(ENV_API_URL) {
            builder = builder.api_base_url(url);
        }
        if let Some(path) = env(ENV_STORAGE_PATH) {
            builder = builder.storage_path(path);
        }
        if let Some(secs) = parse_secs(ENV_VERIFY_INTERVAL, env(ENV_VERIFY_INTERVAL))? {
            builder = builder.verify_interval(secs);
        }
        if let Some(secs) = parse_secs(ENV_UNREAD_POLL, env(ENV_UNREAD_POLL))? {
            builder = builder.unread_poll_interval(secs);
        }
        if let Some(secs) = parse_secs(ENV_REQUEST_TIMEOUT, env(ENV_REQUEST_TIMEOUT))? {
            builder = builder.request_timeout(secs);
        }

        Self::with_builder(builder)
    }

    pub fn default_config_file() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Full URL for an API endpoint. Each segment is appended to the base
    /// path and percent-encoded, so ids and emails cannot escape it.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ConfigError> {
        let mut url = self.app.api_base()?;
        url.path_segments_mut()
            .map_err(|_| ConfigError::InvalidUrl(self.app.api_base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn api_base_url(&self) -> &str {
        &self.app.api_base_url
    }

    pub fn verify_interval(&self) -> Duration {
        self.app.verify_interval
    }

    pub fn unread_poll_interval(&self) -> Duration {
        self.app.unread_poll_interval
    }

    pub fn request_timeout(&self) -> Duration {
        self.app.request_timeout
    }

    /// Configured session database path, or `<data_dir>/society-portal/session.db`
    pub fn storage_path(&self) -> PathBuf {
        if let Some(path) = &self.app.storage_path {
            return path.clone();
        }
        let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
        path.push(APP_DIR);
        path.push("session.db");
        path
    }
}

fn parse_secs(key: &'static str, value: Option<String>) -> Result<Option<Duration>, ConfigError> {
    match value {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.api_base_url(), "http://127.0.0.1:5000/api");
        assert_eq!(config.verify_interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_endpoint() {
        let config = Config::new();
        assert_eq!(
            config.endpoint(&["user", "verify-token"]).unwrap().as_str(),
            "http://127.0.0.1:5000/api/user/verify-token"
        );
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let config = Config::new();
        let url = config
            .endpoint(&["membership", "email", "jane#x@society.org"])
            .unwrap();
        assert_eq!(url.path(), "/api/membership/email/jane%23x@society.org");
        assert_eq!(url.fragment(), None);

        let url = config.endpoint(&["admin", "users", "../memberships"]).unwrap();
        assert_eq!(url.path(), "/api/admin/users/..%2Fmemberships");
    }

    #[test]
    fn test_env_overrides_file() {
        let file = FileConfig::parse(
            r#"
            api_base_url = "https://file.example.org/api"
            unread_poll_secs = 45
            "#,
        )
        .unwrap();
        let env = env_from(&[
            ("PORTAL_API_URL", "https://env.example.org/api"),
            ("PORTAL_VERIFY_INTERVAL_SECS", "60"),
        ]);
        let config = Config::from_sources(Some(file), env).unwrap();
        assert_eq!(config.api_base_url(), "https://env.example.org/api");
        assert_eq!(config.unread_poll_interval(), Duration::from_secs(45));
        assert_eq!(config.verify_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_bad_env_number() {
        let env = env_from(&[("PORTAL_UNREAD_POLL_SECS", "soon")]);
        let err = Config::from_sources(None, env).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORTAL_UNREAD_POLL_SECS", .. }));
    }

    #[test]
    fn test_unknown_file_key_rejected() {
        assert!(FileConfig::parse("colour = \"blue\"").is_err());
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let read = FileConfig::read(&dir.path().join("absent.toml")).unwrap();
        assert!(read.is_none());
    }

    #[test]
    fn test_storage_path_override() {
        let env = env_from(&[("PORTAL_STORAGE_PATH", "/tmp/portal-test.db")]);
        let config = Config::from_sources(None, env).unwrap();
        assert_eq!(config.storage_path(), PathBuf::from("/tmp/portal-test.db"));
    }

    #[test]
    #[serial_test::serial]
    fn test_load_reads_process_env() {
        std::env::set_var("PORTAL_API_URL", "https://serial.example.org/api");
        let config = Config::load();
        std::env::remove_var("PORTAL_API_URL");
        assert_eq!(config.unwrap().api_base_url(), "https://serial.example.org/api");
    }
}
