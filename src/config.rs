use reqwest::Url;
use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const API_URL_VAR: &str = "DISCOUNT_SCOUT_API_URL";
pub const TIMEOUT_VAR: &str = "DISCOUNT_SCOUT_TIMEOUT_SECS";
pub const LOG_VAR: &str = "DISCOUNT_SCOUT_LOG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid API URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Settings for talking to the discount comparison backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("discount-scout/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Load settings from the environment, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        match lookup(API_URL_VAR) {
            Some(value) => config = config.with_base_url(&value)?,
            None => info!("{API_URL_VAR} not set, using default: {DEFAULT_API_URL}"),
        }

        match lookup(TIMEOUT_VAR) {
            Some(value) => {
                let secs = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: TIMEOUT_VAR,
                        value: value.clone(),
                    })?;
                config.timeout = Duration::from_secs(secs);
            }
            None => info!("{TIMEOUT_VAR} not set, using default: {DEFAULT_TIMEOUT_SECS}"),
        }

        Ok(config)
    }

    /// Replace the backend base URL
    pub fn with_base_url(mut self, value: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(value.trim()).map_err(|e| ConfigError::InvalidUrl {
            value: value.to_string(),
            reason: e.to_string(),
        })?;

        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                value: value.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        self.base_url = url;
        Ok(self)
    }
}
