//! # Show
//!
//! Room and session server for Show, a four-player matching-card game.
//!
//! Browsers connect over WebSocket and exchange JSON events. Players
//! create or join rooms of four, claim cards from a shared deck in turn,
//! and race to show a four-of-a-kind. Every room runs as its own actor;
//! each player only ever sees the fruit on cards they hold.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use show::prelude::*;
//!
//! # async fn start() -> Result<(), ShowError> {
//! let config = ServerConfig::from_env()?;
//! let server = ShowServerBuilder::from_config(&config).build().await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{ConfigError, DEFAULT_PORT, ServerConfig};
pub use error::ShowError;
pub use server::{DEFAULT_HANDSHAKE_TIMEOUT, ShowServer, ShowServerBuilder};

pub mod prelude {
    pub use crate::{ServerConfig, ShowError, ShowServer, ShowServerBuilder};
    pub use show_protocol::{ClientEvent, GameState, PlayerId, RoomId, ServerEvent};
    pub use show_room::RoomConfig;
}
