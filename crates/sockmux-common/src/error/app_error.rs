//! Application error types
//!
//! Errors that can stop the gateway process from starting or serving.

use crate::config::ConfigError;
use std::fmt;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    // Listener errors
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    // Serving errors
    #[error("Server error: {0}")]
    Server(String),
}

impl AppError {
    /// Get a stable error code for logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Bind { .. } => "BIND_ERROR",
            Self::Server(_) => "SERVER_ERROR",
        }
    }

    /// Create a bind error for an address
    #[must_use]
    pub fn bind(addr: impl fmt::Display, source: std::io::Error) -> Self {
        Self::Bind {
            addr: addr.to_string(),
            source,
        }
    }

    /// Create a server error
    #[must_use]
    pub fn server(msg: impl fmt::Display) -> Self {
        Self::Server(msg.to_string())
    }
}
