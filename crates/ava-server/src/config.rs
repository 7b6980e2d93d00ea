//! Server configuration loading from file and environment variables.

use ava_voice::LiveKitConfig;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// LiveKit credentials used to sign room join tokens.
    #[serde(default)]
    pub livekit: LiveKitConfig,

    /// Cross-origin settings for browser clients.
    #[serde(default)]
    pub cors: CorsConfig,
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

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "ava_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// CORS configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API. Empty allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
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
/// - `AVA_HOST` overrides `server.host`
/// - `AVA_PORT` overrides `server.port`
/// - `AVA_LOG_LEVEL` overrides `logging.level`
/// - `AVA_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `AVA_CORS_ORIGINS` overrides `cors.allowed_origins` (comma separated)
/// - `LIVEKIT_URL`, `LIVEKIT_PUBLIC_URL`, `LIVEKIT_API_KEY`,
///   `LIVEKIT_API_SECRET`, `LIVEKIT_TOKEN_TTL_SECONDS` override the
///   matching `livekit.*` keys
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let config = match path {
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

    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}

/// Applies environment overrides using `lookup` to read variables.
///
/// Unparseable numeric or address values are ignored, keeping the file value.
pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("AVA_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = lookup("AVA_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(level) = lookup("AVA_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("AVA_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(origins) = lookup("AVA_CORS_ORIGINS") {
        config.cors.allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();
    }

    if let Some(url) = lookup("LIVEKIT_URL") {
        config.livekit.url = url;
    }
    if let Some(public_url) = lookup("LIVEKIT_PUBLIC_URL") {
        config.livekit.public_url = public_url;
    }
    if let Some(api_key) = lookup("LIVEKIT_API_KEY") {
        config.livekit.api_key = api_key;
    }
    if let Some(api_secret) = lookup("LIVEKIT_API_SECRET") {
        config.livekit.api_secret = api_secret;
    }
    if let Some(ttl) = lookup("LIVEKIT_TOKEN_TTL_SECONDS") {
        if let Ok(parsed) = ttl.parse() {
            config.livekit.token_ttl_seconds = parsed;
        }
    }

    config
}
