//! Client configuration loaded from JSON or the environment.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::options::ClientOption;

pub const ENV_BASE_URL: &str = "REST_CLIENT_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "REST_CLIENT_TIMEOUT_MS";
pub const ENV_DEFAULT_HEADERS: &str = "REST_CLIENT_DEFAULT_HEADERS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings for building a `Client`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,

    /// Default per-request timeout in milliseconds. Zero means no limit.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Install `Content-Type`/`Accept: application/json` on every call.
    #[serde(default)]
    pub default_headers: bool,

    /// Extra headers sent with every call.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: None,
            default_headers: false,
            headers: BTreeMap::new(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read `REST_CLIENT_BASE_URL` (required), `REST_CLIENT_TIMEOUT_MS` and
    /// `REST_CLIENT_DEFAULT_HEADERS` (`true`/`false`/`1`/`0`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(ENV_BASE_URL).ok_or(ConfigError::MissingVar(ENV_BASE_URL))?;
        let mut config = Self::new(base_url);

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            let ms = raw.trim().parse().map_err(|_| ConfigError::InvalidVar {
                name: ENV_TIMEOUT_MS,
                value: raw.clone(),
            })?;
            config.timeout_ms = Some(ms);
        }

        if let Some(raw) = lookup(ENV_DEFAULT_HEADERS) {
            config.default_headers = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidVar {
                        name: ENV_DEFAULT_HEADERS,
                        value: raw,
                    })
                }
            };
        }

        Ok(config)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Options equivalent to this config, in the order they are applied.
    pub fn client_options(&self) -> Vec<ClientOption> {
        let mut options = Vec::new();
        if self.default_headers {
            options.push(ClientOption::default_headers());
        }
        options.extend(
            self.headers
                .iter()
                .map(|(key, value)| ClientOption::header(key.as_str(), value.as_str())),
        );
        if let Some(timeout) = self.timeout() {
            options.push(ClientOption::timeout(timeout));
        }
        options
    }
}
