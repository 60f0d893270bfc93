//! Room configuration and derived lifecycle phase.

use serde::{Deserialize, Serialize};

/// Seats per room. Show is played by exactly four.
pub const SEATS: usize = 4;

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration shared by every room a registry creates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Points for the 1st, 2nd, 3rd and 4th player to show a
    /// four-of-a-kind in a round.
    pub placement_points: [u32; SEATS],

    /// Seed for room ids, shuffles and turn picks. `None` seeds from the
    /// OS; tests pass a fixed value to get reproducible deals.
    pub seed: Option<u64>,

    /// Capacity of each room actor's command queue.
    pub command_buffer: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            placement_points: [400, 300, 200, 100],
            seed: None,
            command_buffer: 64,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomPhase
// ---------------------------------------------------------------------------

/// Where a room is in its life, derived from seat count and the started
/// flag rather than stored.
///
/// ```text
/// Empty → Forming (1–3 seated) → Ready (4 seated) → InProgress
///                  ↑                  ↑                 │
///                  └── a player leaves┴── round scored ─┘
/// ```
///
/// There is no terminal phase: scores keep accumulating over as many
/// rounds as the players start. A room is destroyed, from any phase, the
/// moment its last player leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomPhase {
    Empty,
    Forming,
    Ready,
    InProgress,
}

impl std::fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::Forming => write!(f, "Forming"),
            Self::Ready => write!(f, "Ready"),
            Self::InProgress => write!(f, "InProgress"),
        }
    }
}
