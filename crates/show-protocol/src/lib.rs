//! Wire protocol for the Show server.
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`CardView`], ids):
//!   what travels between browser and server.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how events become bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! The protocol layer knows nothing about rooms or connections; it sits
//! between the transport (raw frames) and the session router (player
//! context).
//!
//! ```text
//! Transport (bytes) → Protocol (events) → Session (player + room)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    CardId, CardView, ClientEvent, Fruit, GameState, PlayerId, PlayerScore,
    RoomId, ServerEvent,
};
