use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use super::url::api_origin;

pub const DEFAULT_API_BASE: &str = "https://masjidaltaubah.co.za/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

pub const BASE_URL_ENV: &str = "MASJID_API_BASE";
pub const TIMEOUT_ENV: &str = "MASJID_API_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("base url must be an absolute http(s) url: {0}")]
    InvalidBaseUrl(String),
    #[error("timeout must be a positive number of seconds: {0}")]
    InvalidTimeout(String),
}

/// Immutable settings shared by every request the content client makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    origin: String,
    timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            origin: api_origin(DEFAULT_API_BASE),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = base_url.into();
        let trimmed = raw.trim().trim_end_matches('/');
        let lowered = trimmed.to_ascii_lowercase();
        let has_scheme = lowered.starts_with("http://") || lowered.starts_with("https://");
        if !has_scheme || reqwest::Url::parse(trimmed).is_err() {
            return Err(ConfigError::InvalidBaseUrl(raw));
        }

        Ok(Self {
            base_url: trimmed.to_string(),
            origin: api_origin(trimmed),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(format!("{timeout:?}")));
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The base url with any trailing `/api` segment removed.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn to_absolute_url(&self, url: &str) -> String {
        super::url::to_absolute_url(&self.origin, url)
    }

    /// Loads `.env.local` when present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|_| None)
    }

    /// Like [`ClientConfig::from_env`], but values from `overrides` replace
    /// environment values before anything is validated.
    pub fn from_env_with<F>(overrides: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let _ = dotenvy::from_filename(".env.local");
        Self::from_lookup(|key| overrides(key).or_else(|| std::env::var(key).ok()))
    }

    /// Reads settings from a dotenv file, falling back to the process
    /// environment for keys the file does not define.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        if let Ok(entries) = dotenvy::from_path_iter(path.as_ref()) {
            for (key, value) in entries.flatten() {
                values.insert(key, value);
            }
        }
        Self::from_lookup(|key| values.get(key).cloned().or_else(|| std::env::var(key).ok()))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_ENV)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let config = Self::new(base_url)?;

        match lookup(TIMEOUT_ENV).filter(|value| !value.trim().is_empty()) {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
                config
                    .with_timeout(Duration::from_secs(secs))
                    .map_err(|_| ConfigError::InvalidTimeout(raw))
            }
            None => Ok(config),
        }
    }
}
