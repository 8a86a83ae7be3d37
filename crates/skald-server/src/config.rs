//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use skald_voice::ProviderConfig;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Session store settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Provider settings (API keys, endpoints).
    #[serde(default)]
    pub providers: ProviderConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Session store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Cap on concurrently retained sessions; the least-recently-used
    /// session is evicted beyond this.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "skald_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    8000
}

fn default_max_sessions() -> usize {
    crate::session::DEFAULT_MAX_SESSIONS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `SKALD_HOST` overrides `server.host`
/// - `SKALD_PORT` overrides `server.port`
/// - `SKALD_MAX_SESSIONS` overrides `session.max_sessions`
/// - `SKALD_LOG_LEVEL` overrides `logging.level`
/// - `SKALD_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `ASSEMBLYAI_API_KEY`, `GEMINI_API_KEY`, `MURF_API_KEY` override the
///   corresponding provider keys
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(host) = std::env::var("SKALD_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("SKALD_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(max) = std::env::var("SKALD_MAX_SESSIONS") {
        if let Ok(parsed) = max.parse() {
            config.session.max_sessions = parsed;
        }
    }
    if let Ok(level) = std::env::var("SKALD_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("SKALD_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Ok(key) = std::env::var("ASSEMBLYAI_API_KEY") {
        config.providers.assemblyai_api_key = key;
    }
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        config.providers.gemini_api_key = key;
    }
    if let Ok(key) = std::env::var("MURF_API_KEY") {
        config.providers.murf_api_key = key;
    }

    Ok(config)
}
