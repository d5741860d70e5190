//! Environment configuration.

use std::env;
use std::time::Duration;

use clyre_api::{normalize_base_url, ClyreApiConfig, Credentials};
use thiserror::Error;

use crate::logging::DEFAULT_LOG_FILTER;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CLYRE_TIMEOUT_SEC must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub api_url: Option<String>,
    pub timeout: Option<Duration>,
    pub log_filter: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub no_stream: bool,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: env_string_opt("CLYRE_API_URL"),
            timeout: env_timeout("CLYRE_TIMEOUT_SEC")?,
            log_filter: env_string_opt("CLYRE_LOG"),
            email: env_string_opt("CLYRE_EMAIL"),
            password: env_string_opt("CLYRE_PASSWORD"),
            no_stream: env_flag("CLYRE_NO_STREAM"),
        })
    }

    pub fn api_config(&self) -> ClyreApiConfig {
        let mut config = ClyreApiConfig::default();
        if let Some(url) = &self.api_url {
            config = config.with_base_url(normalize_base_url(url));
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        config
    }

    /// Login credentials, only when both halves are set.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some(Credentials::new(email, password)),
            _ => None,
        }
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

fn env_timeout(key: &str) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = env_string_opt(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(seconds) if seconds > 0 => Ok(Some(Duration::from_secs(seconds))),
        _ => Err(ConfigError::InvalidTimeout(raw)),
    }
}
