//! Unified error type for the Show server.

use show_protocol::ProtocolError;
use show_room::RoomError;
use show_session::SessionError;
use show_transport::TransportError;

use crate::config::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates the `From` impls,
/// so `?` converts layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ShowError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Room(#[from] RoomError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use show_protocol::RoomId;

    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let show_err: ShowError = err.into();
        assert!(matches!(show_err, ShowError::Transport(_)));
        assert!(show_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_session_error_keeps_message() {
        let err = SessionError::AlreadyInRoom(RoomId::from("r1"));
        let show_err: ShowError = err.into();
        assert!(matches!(show_err, ShowError::Session(_)));
        assert_eq!(show_err.to_string(), "already in room r1");
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::NotFound(RoomId::from("r9"));
        let show_err: ShowError = err.into();
        assert!(matches!(show_err, ShowError::Room(_)));
        assert_eq!(show_err.to_string(), "room r9 not found");
    }

    #[test]
    fn test_from_config_error() {
        let err = ConfigError::InvalidPort("http".into());
        let show_err: ShowError = err.into();
        assert!(matches!(show_err, ShowError::Config(_)));
    }
}
