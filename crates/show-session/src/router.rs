//! The session router: maps client events onto the registry and rooms.

use std::sync::Arc;

use show_protocol::{ClientEvent, PlayerId, RoomId, ServerEvent};
use show_room::{PlayerSender, RoomConfig, RoomHandle, RoomRegistry};
use tokio::sync::Mutex;

use crate::{Session, SessionError};

/// Routes events from every connection. Cheap to clone; all clones share
/// one registry.
///
/// ## Event table
///
/// | Event          | Effect                                             |
/// |----------------|----------------------------------------------------|
/// | `createRoom`   | new room, caller seated, `roomCreated`, snapshot   |
/// | `joinRoom(id)` | caller seated, `joinedRoom`, snapshot; or error    |
/// | `joinRandom`   | oldest open room, as `joinRoom`; or error          |
/// | `startGame`    | deal a round in the caller's room                  |
/// | `selectCard`   | claim a card in the caller's room                  |
/// | `showCards`    | check every seat for a four-of-a-kind              |
/// | (disconnect)   | leave; the last one out deletes the room           |
///
/// Join failures go back to the caller as `joinError`. Game commands
/// from a connection without a room are ignored.
#[derive(Clone)]
pub struct SessionRouter {
    registry: Arc<Mutex<RoomRegistry>>,
}

impl SessionRouter {
    pub fn new(config: RoomConfig) -> Self {
        Self::with_registry(Arc::new(Mutex::new(RoomRegistry::new(config))))
    }

    /// Builds a router over an existing shared registry.
    pub fn with_registry(registry: Arc<Mutex<RoomRegistry>>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Mutex<RoomRegistry>> {
        &self.registry
    }

    /// Starts a session for a new connection and tells the client its
    /// player id.
    pub fn open(&self, outbound: PlayerSender) -> Session {
        let player_id = PlayerId::random(&mut rand::rng());
        let session = Session::new(player_id.clone(), outbound);
        session.send(ServerEvent::Connected(player_id.clone()));
        tracing::info!(%player_id, "session opened");
        session
    }

    /// Applies one client event on behalf of `session`.
    ///
    /// Join-type failures are reported to the client and return `Ok`.
    ///
    /// # Errors
    /// Returns [`SessionError::Room`] if the session's room stopped
    /// answering.
    pub async fn dispatch(&self, session: &mut Session, event: ClientEvent) -> Result<(), SessionError> {
        match event {
            ClientEvent::CreateRoom => {
                let result = self.create_room(session).await;
                self.report_join(session, result, ServerEvent::RoomCreated).await
            }
            ClientEvent::JoinRoom(room_id) => {
                let result = self.join_room(session, &room_id).await;
                self.report_join(session, result, ServerEvent::JoinedRoom).await
            }
            ClientEvent::JoinRandom => {
                let result = self.join_random(session).await;
                self.report_join(session, result, ServerEvent::JoinedRoom).await
            }
            ClientEvent::StartGame => {
                if let Some(room) = seated(session, "startGame") {
                    room.start_game(session.player_id().clone()).await?;
                }
                Ok(())
            }
            ClientEvent::SelectCard(card_id) => {
                if let Some(room) = seated(session, "selectCard") {
                    room.select_card(session.player_id().clone(), card_id).await?;
                }
                Ok(())
            }
            ClientEvent::ShowCards => {
                if let Some(room) = seated(session, "showCards") {
                    room.show_cards(session.player_id().clone()).await?;
                }
                Ok(())
            }
        }
    }

    /// Ends a session: frees its seat and deletes the room if it is now
    /// empty.
    ///
    /// The registry stays locked from leave to delete, so nobody can join
    /// a room between it emptying and its removal.
    pub async fn disconnect(&self, mut session: Session) {
        let player_id = session.player_id().clone();
        if let Some(room) = session.unseat() {
            let room_id = room.room_id().clone();
            let mut registry = self.registry.lock().await;
            match registry.leave(&room_id, player_id.clone()).await {
                Ok(0) => {
                    if let Err(e) = registry.delete(&room_id).await {
                        tracing::debug!(%room_id, error = %e, "room already gone");
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(%room_id, %player_id, error = %e, "leave failed");
                    // A dead actor would otherwise linger in the registry.
                    let _ = registry.delete(&room_id).await;
                }
            }
        }
        tracing::info!(%player_id, "session closed");
    }

    async fn create_room(&self, session: &Session) -> Result<RoomHandle, SessionError> {
        ensure_unseated(session)?;
        let mut registry = self.registry.lock().await;
        let room_id = registry.create();
        match registry
            .join(&room_id, session.player_id().clone(), session.outbound())
            .await
        {
            Ok(handle) => Ok(handle),
            Err(e) => {
                let _ = registry.delete(&room_id).await;
                Err(e.into())
            }
        }
    }

    async fn join_room(&self, session: &Session, room_id: &RoomId) -> Result<RoomHandle, SessionError> {
        ensure_unseated(session)?;
        let mut registry = self.registry.lock().await;
        let handle = registry
            .join(room_id, session.player_id().clone(), session.outbound())
            .await?;
        Ok(handle)
    }

    async fn join_random(&self, session: &Session) -> Result<RoomHandle, SessionError> {
        ensure_unseated(session)?;
        let mut registry = self.registry.lock().await;
        let handle = registry
            .join_open(session.player_id().clone(), session.outbound())
            .await?;
        Ok(handle)
    }

    /// Acknowledges a successful join and pushes the first snapshot, or
    /// sends `joinError`.
    async fn report_join(
        &self,
        session: &mut Session,
        result: Result<RoomHandle, SessionError>,
        ack: fn(RoomId) -> ServerEvent,
    ) -> Result<(), SessionError> {
        match result {
            Ok(room) => {
                // The ack is queued before the broadcast is even requested,
                // so the client always sees it first.
                session.send(ack(room.room_id().clone()));
                session.seat(room.clone());
                room.broadcast().await?;
                Ok(())
            }
            Err(e) => {
                tracing::debug!(player_id = %session.player_id(), error = %e, "join rejected");
                session.send(ServerEvent::JoinError(e.to_string()));
                Ok(())
            }
        }
    }
}

fn ensure_unseated(session: &Session) -> Result<(), SessionError> {
    match session.room_id() {
        Some(room_id) => Err(SessionError::AlreadyInRoom(room_id.clone())),
        None => Ok(()),
    }
}

/// Returns the session's room, or logs and returns `None` when the
/// connection isn't seated anywhere.
fn seated<'a>(session: &'a Session, command: &str) -> Option<&'a RoomHandle> {
    let room = session.room();
    if room.is_none() {
        tracing::debug!(player_id = %session.player_id(), command, "no room, ignoring");
    }
    room
}
