//! Server configuration
//!
//! ServerConfig is rebuilt from the environment on every launch and is never
//! persisted. All settings have defaults except that a malformed value is an
//! error rather than being silently replaced.

use axum::http::HeaderValue;
use std::path::PathBuf;
use thiserror::Error;

pub const DB_PATH_VAR: &str = "MINDMAP_DB_PATH";
pub const HOST_VAR: &str = "MINDMAP_HOST";
pub const PORT_VAR: &str = "MINDMAP_PORT";
pub const CORS_VAR: &str = "CORS_ALLOW_ORIGIN";

pub const DEFAULT_DB_PATH: &str = "./data/mindmap.db";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 4000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid MINDMAP_PORT '{value}': expected a port number")]
    InvalidPort { value: String },

    #[error("Invalid CORS_ALLOW_ORIGIN entry '{value}': must be a valid HTTP origin")]
    InvalidOrigin { value: String },
}

/// Runtime configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Database file; parent directories are created on startup
    pub db_path: PathBuf,

    pub host: String,

    pub port: u16,

    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<HeaderValue>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Build config from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(path) = get(DB_PATH_VAR) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(host) = get(HOST_VAR) {
            config.host = host;
        }

        if let Some(port) = get(PORT_VAR) {
            config.port = port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value: port })?;
        }

        if let Some(origins) = get(CORS_VAR) {
            config.cors_origins = parse_origins(&origins)?;
        }

        Ok(config)
    }

    /// Address the listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| ConfigError::InvalidOrigin {
                    value: origin.to_string(),
                })
        })
        .collect()
}
