//! Error types for the room layer.

use show_protocol::{PlayerId, RoomId};

/// Errors that can occur during room operations.
///
/// The `Display` text of the first three variants is what a client sees
/// in its `joinError` event.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist (never did, or its last player left).
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// All four seats are taken.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// Every registered room is full, or there are none.
    #[error("no available rooms")]
    NoOpenRoom,

    /// The player already holds a seat in this room.
    #[error("player {0} already in room {1}")]
    AlreadyInRoom(PlayerId, RoomId),

    /// The room's actor has stopped or its command queue is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
