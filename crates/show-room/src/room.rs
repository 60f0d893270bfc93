//! The pure room state machine: seats, deal, turns, showing and scoring.
//!
//! Nothing in here touches channels or tasks. Every mutator reports
//! whether it changed anything; the room actor decides who to notify.
//!
//! # Round rules
//!
//! - A round starts only with exactly [`SEATS`] players seated, and not
//!   while cards of a running round remain in the shared deck.
//! - On your turn you claim one card from the shared deck; the turn then
//!   passes to the next seat.
//! - Anyone may call for a show. Every seat holding all copies of one
//!   fruit joins the show order once; when all seats have shown, points
//!   are awarded and the round ends.
//! - A player leaving mid-round halts the round and discards the deal.

use std::collections::BTreeMap;

use rand::Rng;
use rand::rngs::StdRng;
use show_protocol::{CardId, CardView, GameState, PlayerId, PlayerScore, RoomId};

use crate::deck::{COPIES_PER_FRUIT, Card, deal};
use crate::{RoomConfig, RoomError, RoomPhase, SEATS};

/// What a call for a show changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowOutcome {
    /// Nobody new had a four-of-a-kind (or no round is running).
    Nothing,
    /// These players joined the show order, in seat order.
    Shown(Vec<PlayerId>),
    /// The show order filled up and was scored: each entrant with the
    /// points they were awarded, in show order.
    Scored(Vec<(PlayerId, u32)>),
}

impl ShowOutcome {
    /// Returns `true` if room state changed.
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Nothing)
    }
}

/// A seated player.
#[derive(Debug, Clone)]
struct Seat {
    player_id: PlayerId,
    hand: Vec<Card>,
    score: u32,
}

/// One game's full state.
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    /// Seat order is join order and drives turn rotation.
    seats: Vec<Seat>,
    /// Cards nobody has claimed yet.
    shared: Vec<Card>,
    /// Ids of every card of the current deal, in shuffle order. Clients
    /// lay the table out from this.
    table: Vec<CardId>,
    started: bool,
    current_turn: Option<PlayerId>,
    show_order: Vec<PlayerId>,
    placement_points: [u32; SEATS],
    rng: StdRng,
}

impl Room {
    /// Creates an empty room. `rng` drives every shuffle and turn pick.
    pub fn new(id: RoomId, config: &RoomConfig, rng: StdRng) -> Self {
        Self {
            id,
            seats: Vec::with_capacity(SEATS),
            shared: Vec::new(),
            table: Vec::new(),
            started: false,
            current_turn: None,
            show_order: Vec::new(),
            placement_points: config.placement_points,
            rng,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn contains(&self, player_id: &PlayerId) -> bool {
        self.seat(player_id).is_some()
    }

    /// Seated players in seat order.
    pub fn players(&self) -> impl Iterator<Item = &PlayerId> {
        self.seats.iter().map(|s| &s.player_id)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn current_turn(&self) -> Option<&PlayerId> {
        self.current_turn.as_ref()
    }

    pub fn show_order(&self) -> &[PlayerId] {
        &self.show_order
    }

    /// Cards still unclaimed in the shared deck.
    pub fn shared_deck(&self) -> &[Card] {
        &self.shared
    }

    pub fn hand(&self, player_id: &PlayerId) -> Option<&[Card]> {
        self.seat(player_id).map(|s| s.hand.as_slice())
    }

    pub fn score(&self, player_id: &PlayerId) -> Option<u32> {
        self.seat(player_id).map(|s| s.score)
    }

    pub fn phase(&self) -> RoomPhase {
        match (self.seats.len(), self.started) {
            (_, true) => RoomPhase::InProgress,
            (0, false) => RoomPhase::Empty,
            (SEATS, false) => RoomPhase::Ready,
            (_, false) => RoomPhase::Forming,
        }
    }

    // -----------------------------------------------------------------------
    // Seating
    // -----------------------------------------------------------------------

    /// Seats a player with an empty hand and a zero score.
    ///
    /// # Errors
    /// [`RoomError::RoomFull`] when all seats are taken,
    /// [`RoomError::AlreadyInRoom`] when the player is already seated.
    /// Either way the room is left untouched.
    pub fn add_player(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        if self.contains(&player_id) {
            return Err(RoomError::AlreadyInRoom(player_id, self.id.clone()));
        }
        if self.seats.len() >= SEATS {
            return Err(RoomError::RoomFull(self.id.clone()));
        }
        self.seats.push(Seat {
            player_id,
            hand: Vec::new(),
            score: 0,
        });
        Ok(())
    }

    /// Frees a player's seat. Returns `false` if they weren't seated.
    ///
    /// Leaving during a round halts it: fewer than four players can't
    /// finish a deal.
    pub fn remove_player(&mut self, player_id: &PlayerId) -> bool {
        let Some(index) = self.seats.iter().position(|s| &s.player_id == player_id) else {
            return false;
        };
        self.seats.remove(index);
        if self.started {
            self.halt_round();
        }
        true
    }

    // -----------------------------------------------------------------------
    // Play
    // -----------------------------------------------------------------------

    /// Deals a new round and picks a random starting player.
    ///
    /// Returns `false` (and changes nothing) unless exactly four players
    /// are seated and no running round still has cards to claim.
    pub fn start_game(&mut self) -> bool {
        if self.seats.len() != SEATS {
            return false;
        }
        if self.started && !self.shared.is_empty() {
            return false;
        }

        let cards = deal(&mut self.rng);
        self.table = cards.iter().map(|c| c.id().clone()).collect();
        self.shared = cards;
        for seat in &mut self.seats {
            seat.hand.clear();
        }
        self.show_order.clear();

        let first = self.rng.random_range(0..self.seats.len());
        self.current_turn = Some(self.seats[first].player_id.clone());
        self.started = true;
        true
    }

    /// Moves a card from the shared deck into the acting player's hand and
    /// passes the turn to the next seat.
    ///
    /// Silently returns `false` before a round starts, out of turn, or
    /// for a card that isn't in the shared deck. Rejections never say
    /// why, so they can't be used to learn hidden state.
    pub fn select_card(&mut self, player_id: &PlayerId, card_id: &CardId) -> bool {
        if !self.started || self.current_turn.as_ref() != Some(player_id) {
            return false;
        }
        let Some(index) = self.shared.iter().position(|c| c.id() == card_id) else {
            return false;
        };
        let Some(seat_index) = self.seats.iter().position(|s| &s.player_id == player_id) else {
            return false;
        };

        let mut card = self.shared.remove(index);
        card.reveal();
        self.seats[seat_index].hand.push(card);

        let next = (seat_index + 1) % self.seats.len();
        self.current_turn = Some(self.seats[next].player_id.clone());
        true
    }

    /// Adds every seat holding a four-of-a-kind to the show order (once
    /// per round), and scores the round once all seats have shown.
    pub fn check_win_condition(&mut self) -> ShowOutcome {
        if !self.started {
            return ShowOutcome::Nothing;
        }

        let mut shown = Vec::new();
        for seat in &self.seats {
            if self.show_order.contains(&seat.player_id) {
                continue;
            }
            if has_four_of_a_kind(&seat.hand) {
                self.show_order.push(seat.player_id.clone());
                shown.push(seat.player_id.clone());
            }
        }

        if self.show_order.len() == SEATS {
            return ShowOutcome::Scored(self.award_points());
        }
        if shown.is_empty() {
            ShowOutcome::Nothing
        } else {
            ShowOutcome::Shown(shown)
        }
    }

    /// Pays out the show order and ends the round.
    fn award_points(&mut self) -> Vec<(PlayerId, u32)> {
        let order = std::mem::take(&mut self.show_order);
        let mut awards = Vec::with_capacity(order.len());
        for (player_id, points) in order.into_iter().zip(self.placement_points) {
            if let Some(seat) = self.seats.iter_mut().find(|s| s.player_id == player_id) {
                seat.score = seat.score.saturating_add(points);
                awards.push((player_id, points));
            }
        }
        self.started = false;
        self.current_turn = None;
        awards
    }

    fn halt_round(&mut self) {
        self.started = false;
        self.current_turn = None;
        self.shared.clear();
        self.table.clear();
        self.show_order.clear();
        for seat in &mut self.seats {
            seat.hand.clear();
        }
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Builds the view of the room that `recipient` is allowed to see.
    ///
    /// A fruit is only ever included for cards the recipient holds.
    pub fn snapshot_for(&self, recipient: &PlayerId) -> GameState {
        let own_hand = self.hand(recipient).unwrap_or_default();

        let cards = self
            .table
            .iter()
            .map(|id| {
                if let Some(card) = own_hand.iter().find(|c| c.id() == id) {
                    return card.view(true);
                }
                if let Some(card) = self.shared.iter().find(|c| c.id() == id) {
                    return card.view(false);
                }
                // Someone else's card: claimed, face hidden.
                CardView {
                    id: id.clone(),
                    fruit: None,
                    is_selected: true,
                }
            })
            .collect();

        GameState {
            cards,
            current_player: self.current_turn.clone(),
            started: self.started,
            player_cards: own_hand.iter().map(|c| c.view(true)).collect(),
            scores: self
                .seats
                .iter()
                .map(|s| PlayerScore {
                    player_id: s.player_id.clone(),
                    score: s.score,
                })
                .collect(),
            show_order: self.show_order.clone(),
        }
    }

    fn seat(&self, player_id: &PlayerId) -> Option<&Seat> {
        self.seats.iter().find(|s| &s.player_id == player_id)
    }
}

fn has_four_of_a_kind(hand: &[Card]) -> bool {
    let mut counts = BTreeMap::new();
    for card in hand {
        *counts.entry(card.fruit()).or_insert(0usize) += 1;
    }
    counts.values().any(|&n| n >= COPIES_PER_FRUIT)
}
