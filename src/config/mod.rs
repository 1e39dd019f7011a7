//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Human-readable or JSON log lines
    pub log_format: LogFormat,

    /// JSON file describing the maps
    pub map_config_path: PathBuf,
    /// Root directory for static files
    pub www_root: PathBuf,

    /// Automatic tick period in milliseconds; 0 means manual ticking
    pub tick_period_ms: u64,
    /// Spawn dogs at random road points instead of the first road's start
    pub randomize_spawn_points: bool,

    /// Allowed client origins for CORS (comma-separated), if any
    pub client_origin: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let server_addr = match lookup("PORT") {
            Some(port) => format!("0.0.0.0:{}", port),
            None => lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(ConfigError::invalid("LOG_FORMAT", other)),
        };

        let tick_period_ms = match lookup("TICK_PERIOD_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("TICK_PERIOD_MS", &raw))?,
            None => 0,
        };

        let randomize_spawn_points = match lookup("RANDOMIZE_SPAWN_POINTS") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| ConfigError::invalid("RANDOMIZE_SPAWN_POINTS", &raw))?,
            None => false,
        };

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,

            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format,

            map_config_path: lookup("MAP_CONFIG_PATH")
                .map(PathBuf::from)
                .ok_or(ConfigError::Missing("MAP_CONFIG_PATH"))?,
            www_root: lookup("WWW_ROOT")
                .map(PathBuf::from)
                .ok_or(ConfigError::Missing("WWW_ROOT"))?,

            tick_period_ms,
            randomize_spawn_points,

            client_origin: lookup("CLIENT_ORIGIN").filter(|s| !s.trim().is_empty()),
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid server address format")]
    InvalidAddress,

    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str) -> Self {
        ConfigError::Invalid {
            var,
            value: value.to_string(),
        }
    }
}
