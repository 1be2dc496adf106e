//! Events emitted by applied commands, broadcast to every session of a game.
//!
//! Events carry only public information; private state travels exclusively
//! in per-seat snapshots.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::state::Seat;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    PlayerJoined {
        player_id: Uuid,
        display_name: String,
    },
    PlayerRejoined {
        player_id: Uuid,
    },
    PlayerLeft {
        player_id: Uuid,
    },
    GameStarted {
        player_count: u8,
    },
    TrickResolved {
        winner: Seat,
        trick_no: u8,
    },
    RoundScored {
        round_no: u8,
        deltas: Vec<i32>,
    },
    GameEnded {
        winner: Seat,
        final_scores: Vec<i32>,
    },
    /// The authoritative state advanced to `version`. Sessions respond by
    /// fetching their own redacted snapshot.
    StateChanged {
        version: u64,
    },
}
