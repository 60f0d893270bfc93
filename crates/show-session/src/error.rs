//! Error types for the session layer.

use show_protocol::RoomId;
use show_room::RoomError;

/// Errors that can occur while routing a client event.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The connection already holds a seat; it must disconnect before
    /// joining anywhere else.
    #[error("already in room {0}")]
    AlreadyInRoom(RoomId),

    #[error(transparent)]
    Room(#[from] RoomError),
}
