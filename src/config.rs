use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::transport::{DEFAULT_BASE_URL, REQUEST_TIMEOUT};

/// Default log filter when neither `RUST_LOG` nor `FAKESTORE_LOG_LEVEL` is set.
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("FAKESTORE_BASE_URL is not a valid http(s) URL: {0}")]
    InvalidBaseUrl(String),
    #[error("FAKESTORE_REQUEST_TIMEOUT_SECS must be a positive integer, got {0:?}")]
    InvalidTimeout(String),
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub base_url: Url,
    pub request_timeout: Duration,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from environment.
    ///
    /// - `FAKESTORE_BASE_URL` (optional, default `https://fakestoreapi.com`): upstream API
    /// - `FAKESTORE_REQUEST_TIMEOUT_SECS` (optional, default 30): per-attempt timeout
    /// - `FAKESTORE_LOG_LEVEL` (optional, default `info`): used when `RUST_LOG` is unset
    /// - `FAKESTORE_LOG_DIR` (optional): also write logs to `<dir>/combined.log`
    ///   and errors to `<dir>/error.log`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = match lookup("FAKESTORE_BASE_URL") {
            Some(raw) => parse_base_url(&raw)?,
            None => parse_base_url(DEFAULT_BASE_URL)?,
        };

        let request_timeout = match lookup("FAKESTORE_REQUEST_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => REQUEST_TIMEOUT,
        };

        let log_level = lookup("FAKESTORE_LOG_LEVEL")
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let log_dir = lookup("FAKESTORE_LOG_DIR")
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            base_url,
            request_timeout,
            log_level,
            log_dir,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidBaseUrl(format!("{raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(url)
}
