//! The per-connection session record.

use show_protocol::{PlayerId, RoomId, ServerEvent};
use show_room::{PlayerSender, RoomHandle};

/// One connected player.
///
/// Created by [`SessionRouter::open`](crate::SessionRouter::open) and
/// owned by the connection's task until it ends. The player id is stable
/// for the connection's lifetime; a reconnect is a new player.
#[derive(Debug)]
pub struct Session {
    player_id: PlayerId,
    /// The room this connection is seated in, if any.
    room: Option<RoomHandle>,
    outbound: PlayerSender,
}

impl Session {
    pub(crate) fn new(player_id: PlayerId, outbound: PlayerSender) -> Self {
        Self {
            player_id,
            room: None,
            outbound,
        }
    }

    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    pub fn room_id(&self) -> Option<&RoomId> {
        self.room.as_ref().map(RoomHandle::room_id)
    }

    pub(crate) fn room(&self) -> Option<&RoomHandle> {
        self.room.as_ref()
    }

    pub(crate) fn seat(&mut self, room: RoomHandle) {
        self.room = Some(room);
    }

    pub(crate) fn unseat(&mut self) -> Option<RoomHandle> {
        self.room.take()
    }

    pub(crate) fn outbound(&self) -> PlayerSender {
        self.outbound.clone()
    }

    /// Queues an event for this connection. Silently drops if the
    /// connection is already gone.
    pub(crate) fn send(&self, event: ServerEvent) {
        let _ = self.outbound.send(event);
    }
}
