//! Types that travel on the wire between browser clients and the server.
//!
//! Every event is a JSON object tagged with its name, with the payload
//! (if any) under `data`:
//!
//! ```text
//! {"event":"joinRoom","data":"3f9c…"}      client → server
//! {"event":"gameState","data":{…}}         server → client
//! ```

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Mints a 32-character lowercase hex string (128 random bits).
fn generate_token<R: Rng>(rng: &mut R) -> String {
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Opaque identifier for a connected player.
///
/// Stable for the lifetime of one connection and carries no meaning
/// beyond uniqueness. Serialized as a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Mints a fresh random player id.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self(generate_token(rng))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier for a room. Players share it to meet in one room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Mints a fresh random room id.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self(generate_token(rng))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of one physical card. Unique per card, never derived from
/// its fruit, so seeing an id tells an opponent nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Mints a fresh random card id.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self(generate_token(rng))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// The four face values of the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fruit {
    Apple,
    Banana,
    Grapes,
    Watermelon,
}

impl Fruit {
    /// Every fruit, in deck-building order.
    pub const ALL: [Fruit; 4] = [
        Fruit::Apple,
        Fruit::Banana,
        Fruit::Grapes,
        Fruit::Watermelon,
    ];
}

impl fmt::Display for Fruit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Apple => "apple",
            Self::Banana => "banana",
            Self::Grapes => "grapes",
            Self::Watermelon => "watermelon",
        })
    }
}

/// One card as a particular recipient is allowed to see it.
///
/// `fruit` is `None` (and omitted from the JSON) whenever the recipient
/// may not know the face value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: CardId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fruit: Option<Fruit>,
    pub is_selected: bool,
}

/// A seat's running score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScore {
    pub player_id: PlayerId,
    pub score: u32,
}

/// The per-recipient room snapshot carried by [`ServerEvent::GameState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Every card of the current deal, in table order.
    pub cards: Vec<CardView>,
    /// Whose turn it is; `null` outside a round.
    pub current_player: Option<PlayerId>,
    pub started: bool,
    /// The recipient's own holding, fruits always visible.
    pub player_cards: Vec<CardView>,
    /// Cumulative scores in seat order.
    pub scores: Vec<PlayerScore>,
    /// Players who have shown a four-of-a-kind this round, in order.
    pub show_order: Vec<PlayerId>,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Client → server events.
///
/// The disconnect event is implicit: it fires when the connection ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Open a new room and take a seat in it.
    CreateRoom,
    /// Take a seat in the named room.
    JoinRoom(RoomId),
    /// Take a seat in the first room with a free seat.
    JoinRandom,
    /// Deal a new round (needs exactly four seated players).
    StartGame,
    /// Claim a card from the shared deck (only on your turn).
    SelectCard(CardId),
    /// Declare a four-of-a-kind; checks every seat.
    ShowCards,
}

/// Server → client events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Sent once on connect: the id this connection plays under.
    Connected(PlayerId),
    RoomCreated(RoomId),
    JoinedRoom(RoomId),
    /// A create/join request failed; the message names the reason.
    JoinError(String),
    GameState(GameState),
}
