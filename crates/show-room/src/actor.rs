//! Room actor: an isolated Tokio task that owns one [`Room`].
//!
//! Each room runs in its own task and is reached only through its
//! command channel, so commands for one room are applied strictly one at
//! a time and no lock ever guards game state.

use std::collections::HashMap;

use show_protocol::{CardId, PlayerId, RoomId, ServerEvent};
use tokio::sync::{mpsc, oneshot};

use crate::{Room, RoomError, RoomPhase, SEATS, ShowOutcome};

/// Channel sender for delivering events to one player's connection.
///
/// Unbounded so a slow reader never stalls the room.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to a room actor through its channel.
///
/// Game commands reply with whether they changed anything; rejected
/// moves are not errors.
pub(crate) enum RoomCommand {
    Join {
        player_id: PlayerId,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Replies with the number of players still seated.
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<usize>,
    },

    StartGame {
        player_id: PlayerId,
        reply: oneshot::Sender<bool>,
    },

    SelectCard {
        player_id: PlayerId,
        card_id: CardId,
        reply: oneshot::Sender<bool>,
    },

    ShowCards {
        player_id: PlayerId,
        reply: oneshot::Sender<bool>,
    },

    /// Push a fresh snapshot to every seated player.
    Broadcast,

    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },

    Shutdown,
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub phase: RoomPhase,
    pub player_count: usize,
    pub max_players: usize,
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl std::fmt::Debug for RoomCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Join { .. } => "Join",
            Self::Leave { .. } => "Leave",
            Self::StartGame { .. } => "StartGame",
            Self::SelectCard { .. } => "SelectCard",
            Self::ShowCards { .. } => "ShowCards",
            Self::Broadcast => "Broadcast",
            Self::GetInfo { .. } => "GetInfo",
            Self::Shutdown => "Shutdown",
        };
        f.write_str(name)
    }
}

impl RoomHandle {
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Seats a player and registers their outbound channel.
    ///
    /// Does not broadcast; the caller acknowledges the join first and
    /// then calls [`broadcast`](Self::broadcast), so the joiner sees the
    /// acknowledgement before the snapshot.
    pub async fn join(&self, player_id: PlayerId, sender: PlayerSender) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Join {
            player_id,
            sender,
            reply,
        })
        .await?;
        rx.await.map_err(|_| self.unavailable())?
    }

    /// Frees a player's seat and returns how many players remain.
    ///
    /// The remaining players get a fresh snapshot.
    pub async fn leave(&self, player_id: PlayerId) -> Result<usize, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Leave { player_id, reply }).await?;
        rx.await.map_err(|_| self.unavailable())
    }

    pub async fn start_game(&self, player_id: PlayerId) -> Result<bool, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::StartGame { player_id, reply }).await?;
        rx.await.map_err(|_| self.unavailable())
    }

    pub async fn select_card(&self, player_id: PlayerId, card_id: CardId) -> Result<bool, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::SelectCard {
            player_id,
            card_id,
            reply,
        })
        .await?;
        rx.await.map_err(|_| self.unavailable())
    }

    pub async fn show_cards(&self, player_id: PlayerId) -> Result<bool, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::ShowCards { player_id, reply }).await?;
        rx.await.map_err(|_| self.unavailable())
    }

    pub async fn broadcast(&self) -> Result<(), RoomError> {
        self.send(RoomCommand::Broadcast).await
    }

    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::GetInfo { reply }).await?;
        rx.await.map_err(|_| self.unavailable())
    }

    /// Tells the actor to stop. Commands already queued ahead of this one
    /// are still applied.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.send(RoomCommand::Shutdown).await
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.sender.send(cmd).await.map_err(|_| self.unavailable())
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.room_id.clone())
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct RoomActor {
    room: Room,
    senders: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::debug!(room_id = %self.room.id(), "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    player_id,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(player_id, sender);
                    let _ = reply.send(result);
                }
                RoomCommand::Leave { player_id, reply } => {
                    let remaining = self.handle_leave(&player_id);
                    let _ = reply.send(remaining);
                }
                RoomCommand::StartGame { player_id, reply } => {
                    let changed = self.handle_start(&player_id);
                    let _ = reply.send(changed);
                }
                RoomCommand::SelectCard {
                    player_id,
                    card_id,
                    reply,
                } => {
                    let changed = self.handle_select(&player_id, &card_id);
                    let _ = reply.send(changed);
                }
                RoomCommand::ShowCards { player_id, reply } => {
                    let changed = self.handle_show(&player_id);
                    let _ = reply.send(changed);
                }
                RoomCommand::Broadcast => self.broadcast(),
                RoomCommand::GetInfo { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Shutdown => break,
            }
        }

        tracing::debug!(room_id = %self.room.id(), "room actor stopped");
    }

    fn handle_join(&mut self, player_id: PlayerId, sender: PlayerSender) -> Result<(), RoomError> {
        self.room.add_player(player_id.clone())?;
        tracing::info!(
            room_id = %self.room.id(),
            %player_id,
            players = self.room.player_count(),
            "player joined"
        );
        self.senders.insert(player_id, sender);
        Ok(())
    }

    fn handle_leave(&mut self, player_id: &PlayerId) -> usize {
        let was_started = self.room.is_started();
        if !self.room.remove_player(player_id) {
            return self.room.player_count();
        }
        self.senders.remove(player_id);

        let remaining = self.room.player_count();
        tracing::info!(
            room_id = %self.room.id(),
            %player_id,
            players = remaining,
            "player left"
        );
        if was_started {
            tracing::info!(room_id = %self.room.id(), "round halted");
        }
        if remaining > 0 {
            self.broadcast();
        }
        remaining
    }

    fn handle_start(&mut self, player_id: &PlayerId) -> bool {
        if !self.is_member(player_id, "startGame") {
            return false;
        }
        if !self.room.start_game() {
            tracing::debug!(room_id = %self.room.id(), %player_id, "start rejected");
            return false;
        }
        tracing::info!(
            room_id = %self.room.id(),
            first = ?self.room.current_turn().map(PlayerId::as_str),
            "game started"
        );
        self.broadcast();
        true
    }

    fn handle_select(&mut self, player_id: &PlayerId, card_id: &CardId) -> bool {
        if !self.is_member(player_id, "selectCard") {
            return false;
        }
        if !self.room.select_card(player_id, card_id) {
            tracing::debug!(room_id = %self.room.id(), %player_id, %card_id, "selection ignored");
            return false;
        }
        self.broadcast();
        true
    }

    fn handle_show(&mut self, player_id: &PlayerId) -> bool {
        if !self.is_member(player_id, "showCards") {
            return false;
        }
        match self.room.check_win_condition() {
            ShowOutcome::Nothing => return false,
            ShowOutcome::Shown(players) => {
                for shown in &players {
                    tracing::info!(room_id = %self.room.id(), player_id = %shown, "player showed");
                }
            }
            ShowOutcome::Scored(awards) => {
                for (winner, points) in &awards {
                    tracing::info!(room_id = %self.room.id(), player_id = %winner, points, "points awarded");
                }
                tracing::info!(room_id = %self.room.id(), "round scored");
            }
        }
        self.broadcast();
        true
    }

    fn is_member(&self, player_id: &PlayerId, command: &str) -> bool {
        if self.room.contains(player_id) {
            return true;
        }
        tracing::warn!(
            room_id = %self.room.id(),
            %player_id,
            command,
            "command from non-member, ignoring"
        );
        false
    }

    /// Sends each seated player the snapshot they are allowed to see.
    /// Silently drops if a receiver is gone.
    fn broadcast(&self) {
        for player_id in self.room.players() {
            if let Some(sender) = self.senders.get(player_id) {
                let state = self.room.snapshot_for(player_id);
                let _ = sender.send(ServerEvent::GameState(state));
            }
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room.id().clone(),
            phase: self.room.phase(),
            player_count: self.room.player_count(),
            max_players: SEATS,
        }
    }
}

/// Spawns a room actor task and returns a handle to it.
///
/// `buffer` bounds the command queue; senders wait when it is full.
pub(crate) fn spawn_room(room: Room, buffer: usize) -> RoomHandle {
    let (sender, receiver) = mpsc::channel(buffer.max(1));
    let handle = RoomHandle {
        room_id: room.id().clone(),
        sender,
    };
    let actor = RoomActor {
        room,
        senders: HashMap::new(),
        receiver,
    };
    tokio::spawn(actor.run());
    handle
}
