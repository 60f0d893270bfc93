//! Room registry: creates, finds and deletes rooms.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use show_protocol::{PlayerId, RoomId};

use crate::actor::spawn_room;
use crate::{PlayerSender, Room, RoomConfig, RoomError, RoomHandle, SEATS};

/// A registered room and how many seats the registry last saw taken.
struct RoomEntry {
    handle: RoomHandle,
    seated: usize,
}

/// Every live room, keyed by id.
///
/// This is the entry point for room operations from the session layer.
/// It is an ordinary owned value; the server shares one behind a
/// `tokio::sync::Mutex`, and tests build as many as they like.
///
/// Seat counts are cached from the joins and leaves routed through the
/// registry, so picking an open room never waits on a room actor. The
/// actor stays the authority: a join it refuses as full corrects the
/// cached count.
pub struct RoomRegistry {
    rooms: HashMap<RoomId, RoomEntry>,
    /// Creation order, oldest first. `find_open` scans in this order.
    order: Vec<RoomId>,
    config: RoomConfig,
    rng: StdRng,
}

impl RoomRegistry {
    /// Creates an empty registry. With `config.seed` set, room ids and
    /// every room's deals are reproducible.
    pub fn new(config: RoomConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rooms: HashMap::new(),
            order: Vec::new(),
            config,
            rng,
        }
    }

    /// Starts an empty room and returns its id.
    pub fn create(&mut self) -> RoomId {
        let room_id = loop {
            let candidate = RoomId::random(&mut self.rng);
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
        };
        let room_rng = StdRng::seed_from_u64(self.rng.random());
        let room = Room::new(room_id.clone(), &self.config, room_rng);
        let handle = spawn_room(room, self.config.command_buffer);

        self.rooms.insert(room_id.clone(), RoomEntry { handle, seated: 0 });
        self.order.push(room_id.clone());
        tracing::info!(%room_id, rooms = self.rooms.len(), "room created");
        room_id
    }

    pub fn get(&self, room_id: &RoomId) -> Result<RoomHandle, RoomError> {
        self.rooms
            .get(room_id)
            .map(|entry| entry.handle.clone())
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))
    }

    /// Returns the oldest room with a free seat.
    pub fn find_open(&self) -> Option<RoomHandle> {
        self.order
            .iter()
            .filter_map(|room_id| self.rooms.get(room_id))
            .find(|entry| entry.seated < SEATS)
            .map(|entry| entry.handle.clone())
    }

    /// Seats a player in a named room.
    pub async fn join(
        &mut self,
        room_id: &RoomId,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<RoomHandle, RoomError> {
        let handle = self.get(room_id)?;
        let result = handle.join(player_id, sender).await;
        self.record_join(room_id, &result);
        result.map(|()| handle)
    }

    /// Seats a player in the oldest room with a free seat.
    pub async fn join_open(
        &mut self,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<RoomHandle, RoomError> {
        let handle = self.find_open().ok_or(RoomError::NoOpenRoom)?;
        let result = handle.join(player_id, sender).await;
        self.record_join(handle.room_id(), &result);
        result.map(|()| handle)
    }

    /// Frees a player's seat and returns how many players remain.
    ///
    /// The room is not deleted here, even when it empties; the caller
    /// decides that while it still holds the registry.
    pub async fn leave(&mut self, room_id: &RoomId, player_id: PlayerId) -> Result<usize, RoomError> {
        let handle = self.get(room_id)?;
        let remaining = handle.leave(player_id).await?;
        if let Some(entry) = self.rooms.get_mut(room_id) {
            entry.seated = remaining;
        }
        Ok(remaining)
    }

    /// Unregisters a room and stops its actor.
    pub async fn delete(&mut self, room_id: &RoomId) -> Result<(), RoomError> {
        let entry = self
            .rooms
            .remove(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        self.order.retain(|id| id != room_id);

        let _ = entry.handle.shutdown().await;
        tracing::info!(%room_id, rooms = self.rooms.len(), "room destroyed");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Live room ids in creation order.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.order.clone()
    }

    /// Seats the registry believes are taken in a room.
    pub fn seated(&self, room_id: &RoomId) -> Option<usize> {
        self.rooms.get(room_id).map(|entry| entry.seated)
    }

    fn record_join(&mut self, room_id: &RoomId, result: &Result<(), RoomError>) {
        let Some(entry) = self.rooms.get_mut(room_id) else {
            return;
        };
        match result {
            Ok(()) => entry.seated = (entry.seated + 1).min(SEATS),
            Err(RoomError::RoomFull(_)) => entry.seated = SEATS,
            Err(_) => {}
        }
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
