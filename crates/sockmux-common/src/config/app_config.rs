//! Application configuration structs
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Route reserved for the health check
pub const HEALTH_PATH: &str = "/health";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub gateway: ServerConfig,
    pub multiplex: MultiplexConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse an environment name, case-insensitively
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Multiplexer endpoint configuration
#[derive(Debug, Clone)]
pub struct MultiplexConfig {
    /// Route the WebSocket upgrade is served on
    pub path: String,
    /// Outgoing frame queue size per connection
    pub message_buffer: usize,
}

impl Default for MultiplexConfig {
    fn default() -> Self {
        Self {
            path: default_multiplex_path(),
            message_buffer: default_message_buffer(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "sockmux".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8081
}

fn default_multiplex_path() -> String {
    "/multiplex".to_string()
}

fn default_message_buffer() -> usize {
    100
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that cannot be used
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Missing keys fall back to defaults.
    ///
    /// # Errors
    /// Returns an error if a key holds a value that cannot be used
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup("MULTIPLEX_PATH").unwrap_or_else(default_multiplex_path);
        if !path.starts_with('/') || path == HEALTH_PATH {
            return Err(ConfigError::InvalidValue("MULTIPLEX_PATH", path));
        }

        let message_buffer: usize =
            parse_or(&lookup, "MULTIPLEX_MESSAGE_BUFFER", default_message_buffer)?;
        if message_buffer == 0 {
            return Err(ConfigError::InvalidValue(
                "MULTIPLEX_MESSAGE_BUFFER",
                message_buffer.to_string(),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            gateway: ServerConfig {
                host: lookup("GATEWAY_HOST").unwrap_or_else(default_host),
                port: parse_or(&lookup, "GATEWAY_PORT", default_gateway_port)?,
            },
            multiplex: MultiplexConfig {
                path,
                message_buffer,
            },
        })
    }
}

/// Parse `key` if present, otherwise use the default
fn parse_or<F, T>(lookup: &F, key: &'static str, default: fn() -> T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
