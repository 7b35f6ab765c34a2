//! Client settings read from `config.toml` with environment overrides.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::query_cache::{DEFAULT_CAPACITY, QueryOptions};

pub const API_URL_ENV: &str = "WHISKY_ADMIN_API_URL";
pub const CONFIG_PATH_ENV: &str = "WHISKY_ADMIN_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("base_url must be an absolute http(s) URL, got '{0}'")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub stale_time_secs: u64,
    pub cache_capacity: u64,
    pub query_retry: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/admin/api/v1".to_string(),
            request_timeout_secs: 15,
            stale_time_secs: 30,
            cache_capacity: DEFAULT_CAPACITY,
            query_retry: 1,
        }
    }
}

impl ClientConfig {
    /// Reads the file named by `WHISKY_ADMIN_CONFIG` (or the per-user
    /// default), then applies `WHISKY_ADMIN_API_URL`. A missing file is not
    /// an error.
    pub async fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| utils::assets::config_file_path());
        let config = Self::load_from(&path).await?;
        config.with_env(|name| std::env::var(name).ok())
    }

    pub async fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => {
                debug!(path = %path.display(), "loaded client config");
                Self::from_toml(&contents)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.base_url = url;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match url::Url::parse(&self.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
            _ => Err(ConfigError::InvalidBaseUrl(self.base_url.clone())),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions::default()
            .stale_time(Duration::from_secs(self.stale_time_secs))
            .retry(self.query_retry)
    }
}
