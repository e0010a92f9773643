//! Application configuration.
//!
//! Built once at startup from an optional TOML file overlaid with
//! environment variables, then passed by reference into constructors.
//! Business logic never reads the environment.

use std::path::Path;

use serde::{Deserialize, Serialize};

use relay_pipeline::PipelineConfig;

use crate::error::{AppError, AppResult};

/// Immutable application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Webhook listen address. Default: `0.0.0.0:8080`.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Order ledger CSV path. Default: `orders.csv`.
    #[serde(default = "default_ledger_path")]
    pub ledger_path: String,

    /// Remote observer endpoint; notification is skipped when unset.
    #[serde(default)]
    pub remote_notify_url: Option<String>,

    /// Notifier request timeout (seconds). Default: 10.
    #[serde(default = "default_notify_timeout_secs")]
    pub notify_timeout_secs: u64,

    /// Exchange REST host. Override for the sandbox environment.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Retry and poll tuning.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Exchange API key. Environment-only, never read from the file.
    #[serde(skip)]
    pub api_key: String,

    /// Exchange API secret. Environment-only, never read from the file.
    #[serde(skip)]
    pub api_secret: String,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_ledger_path() -> String {
    "orders.csv".to_string()
}

fn default_notify_timeout_secs() -> u64 {
    10
}

fn default_base_url() -> String {
    "https://api.gateio.ws".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            ledger_path: default_ledger_path(),
            remote_notify_url: None,
            notify_timeout_secs: default_notify_timeout_secs(),
            base_url: default_base_url(),
            pipeline: PipelineConfig::default(),
            api_key: String::new(),
            api_secret: String::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration: TOML file (when present) plus environment
    /// overrides. Credentials come from the environment only.
    pub fn load(path: &str) -> AppResult<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!(path = %path, "Config file not found, using defaults");
            Self::default()
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Load from a specific file, without the environment overlay.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Overlay recognized environment variables.
    fn apply_env(&mut self) -> AppResult<()> {
        if let Ok(v) = std::env::var("MAX_RETRIES") {
            self.pipeline.max_retries = parse_env("MAX_RETRIES", &v)?;
        }
        if let Ok(v) = std::env::var("RETRY_DELAY") {
            self.pipeline.retry_delay_secs = parse_env("RETRY_DELAY", &v)?;
        }
        if let Ok(v) = std::env::var("CSV_PATH") {
            self.ledger_path = v;
        }
        if let Ok(v) = std::env::var("REMOTE_NOTIFY_URL") {
            if !v.is_empty() {
                self.remote_notify_url = Some(v);
            }
        }
        if let Ok(v) = std::env::var("GATEIO_BASE_URL") {
            self.base_url = v;
        }
        if let Ok(v) = std::env::var("GATEIO_API_KEY") {
            self.api_key = v;
        }
        if let Ok(v) = std::env::var("GATEIO_API_SECRET") {
            self.api_secret = v;
        }
        Ok(())
    }

    /// Credentials are required before the gateway can be built.
    pub fn validate(&self) -> AppResult<()> {
        if self.api_key.is_empty() || self.api_secret.is_empty() {
            return Err(AppError::Config(
                "Missing Gate.io API credentials (GATEIO_API_KEY / GATEIO_API_SECRET)".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> AppResult<T> {
    value
        .parse()
        .map_err(|_| AppError::Config(format!("Invalid {name}: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.ledger_path, "orders.csv");
        assert_eq!(config.pipeline.max_retries, 3);
        assert_eq!(config.pipeline.retry_delay_secs, 2);
        assert!(config.remote_notify_url.is_none());
    }

    #[test]
    fn test_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.toml");
        std::fs::write(
            &path,
            r#"
listen_addr = "127.0.0.1:9000"
ledger_path = "/var/lib/relay/orders.csv"
remote_notify_url = "https://observer.example/hook"

[pipeline]
max_retries = 5
retry_delay_secs = 1
"#,
        )
        .unwrap();

        let config = AppConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.pipeline.max_retries, 5);
        assert_eq!(config.pipeline.retry_delay_secs, 1);
        // Unspecified fields keep their defaults.
        assert_eq!(config.pipeline.poll_max_attempts, 5);
        assert_eq!(
            config.remote_notify_url.as_deref(),
            Some("https://observer.example/hook")
        );
    }

    #[test]
    fn test_validate_requires_credentials() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_err());

        config.api_key = "k".to_string();
        config.api_secret = "s".to_string();
        assert!(config.validate().is_ok());
    }
}
