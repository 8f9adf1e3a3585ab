//! Configuration Module
//!
//! Handles loading gateway configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::connection::ConnectOptions;

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store address (`redis://...` or `memory://`)
    pub redis_url: String,
    /// Password sent during the store handshake
    pub redis_password: Option<String>,
    /// HTTP server port
    pub server_port: u16,
    /// Expired-key sweep interval in seconds for `memory://` stores
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Store address (default: redis://127.0.0.1:6379)
    /// - `REDIS_PASSWORD` - Store password (default: none)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            redis_password: env::var("REDIS_PASSWORD").ok().filter(|v| !v.is_empty()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_interval),
        }
    }

    /// Connection options derived from this configuration.
    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            password: self.redis_password.clone(),
            username: None,
            sweep_interval: (self.sweep_interval > 0)
                .then(|| Duration::from_secs(self.sweep_interval)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            redis_password: None,
            server_port: 3000,
            sweep_interval: 1,
        }
    }
}
