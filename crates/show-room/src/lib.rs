//! Room lifecycle and game rules for the Show server.
//!
//! Each room's state lives in a pure [`Room`] value that knows the rules
//! (seating, dealing, turns, showing, scoring) but nothing about
//! connections. A room actor (an isolated Tokio task) owns one `Room`
//! plus the outbound channels of its seated players, applies commands one
//! at a time, and pushes per-player snapshots after every change.
//!
//! # Key types
//!
//! - [`deal`] / [`Card`]: the 16-card deck for one round
//! - [`Room`]: one game's state and rules
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`RoomRegistry`]: creates, finds and deletes rooms
//! - [`RoomConfig`] / [`RoomPhase`]: settings and derived lifecycle phase

mod actor;
mod config;
mod deck;
mod error;
mod registry;
mod room;

pub use actor::{PlayerSender, RoomHandle, RoomInfo};
pub use config::{RoomConfig, RoomPhase, SEATS};
pub use deck::{COPIES_PER_FRUIT, Card, DECK_SIZE, deal};
pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{Room, ShowOutcome};
