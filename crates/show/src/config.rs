//! Server configuration, read from the environment.

use serde::{Deserialize, Serialize};
use show_room::RoomConfig;

/// Port used when neither `SHOW_BIND` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 3001;

/// Errors from reading configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT value {0:?}")]
    InvalidPort(String),

    #[error("invalid SHOW_SEED value {0:?}")]
    InvalidSeed(String),
}

/// Everything the `show-server` binary needs to start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: String,
    /// Fixed seed for room ids and deals. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{DEFAULT_PORT}"),
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Reads `SHOW_BIND`, `PORT` and `SHOW_SEED` from the process
    /// environment.
    ///
    /// `SHOW_BIND` is a full `host:port`; when absent, `PORT` binds every
    /// interface on that port.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(addr) = lookup("SHOW_BIND") {
            config.bind_addr = addr;
        } else if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
            config.bind_addr = format!("0.0.0.0:{port}");
        }

        if let Some(seed) = lookup("SHOW_SEED") {
            let parsed = seed
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidSeed(seed.clone()))?;
            config.seed = Some(parsed);
        }

        Ok(config)
    }

    /// The room settings this server hands to its registry.
    pub fn room_config(&self) -> RoomConfig {
        RoomConfig {
            seed: self.seed,
            ..RoomConfig::default()
        }
    }
}
