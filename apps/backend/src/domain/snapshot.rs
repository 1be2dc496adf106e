//! Per-seat snapshots of game state.
//!
//! Snapshots are the only game state that ever leaves the engine. Redaction
//! here is a correctness requirement, not a convenience: a snapshot built
//! for one seat carries that seat's hand and only card *counts* for every
//! other seat.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::bidding::{forbidden_bid, legal_bids};
use crate::domain::rules::valid_bid_range;
use crate::domain::state::{GameState, Phase, PreviousRound, Seat};
use crate::domain::tricks::legal_moves;
use crate::domain::{Card, Trump};

/// Public info about a single seat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeatPublic {
    pub seat: Seat,
    pub player_id: Uuid,
    pub display_name: String,
    pub connected: bool,
}

/// Game-level header present in all snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameHeader {
    pub game_id: Uuid,
    pub host: Option<Uuid>,
    pub round_no: Option<u8>,
    pub hand_size: Option<u8>,
    pub dealer: Option<Seat>,
    pub seating: Vec<SeatPublic>,
    pub scores_total: Vec<i32>,
}

/// What the receiving seat is allowed to see of itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewerState {
    pub seat: Seat,
    /// The viewer's own hand, fully visible.
    pub hand: Vec<Card>,
    /// Legal bids right now (empty outside the viewer's bidding turn).
    pub legal_bids: Vec<u8>,
    /// Legal plays right now (empty outside the Playing phase).
    pub playable: Vec<Card>,
}

/// Top-level snapshot combining header, phase data, and the viewer's
/// private slice. `version` increases monotonically with every applied
/// mutation; clients detect gaps with it and re-request a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub version: u64,
    pub game: GameHeader,
    pub phase: PhaseSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub you: Option<ViewerState>,
}

/// Adjacently tagged union of phase-specific snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "data", rename_all = "snake_case")]
pub enum PhaseSnapshot {
    Lobby,
    Dealing,
    Bidding(BiddingSnapshot),
    Playing(TrickSnapshot),
    RoundScoring(ScoringSnapshot),
    GameEnd(GameEndSnapshot),
    Abandoned,
}

/// Shared public round facts. Other seats' hands appear as counts only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundPublic {
    pub trump: Option<Trump>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upcard: Option<Card>,
    pub bids: Vec<Option<u8>>,
    pub tricks_won: Vec<u8>,
    /// Cards remaining per seat.
    pub hand_counts: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_round: Option<PreviousRound>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiddingSnapshot {
    pub round: RoundPublic,
    pub to_act: Seat,
    pub min_bid: u8,
    pub max_bid: u8,
    /// The hook-rule value denied to the final bidder, when it applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forbidden_bid: Option<u8>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrickSnapshot {
    pub round: RoundPublic,
    pub trick_no: u8,
    pub leader: Seat,
    pub to_act: Seat,
    pub current_trick: Vec<(Seat, Card)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_trick: Option<Vec<(Seat, Card)>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringSnapshot {
    pub round: RoundPublic,
    pub round_scores: Vec<i32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEndSnapshot {
    pub winner: Option<Seat>,
    pub final_scores: Vec<i32>,
}

/// Build the snapshot one seat is allowed to see.
///
/// `viewer` of None produces a fully redacted view (no hand at all), used
/// for sessions that joined a game but hold no seat.
pub fn snapshot_for(
    state: &GameState,
    header: GameHeader,
    viewer: Option<Seat>,
    version: u64,
) -> GameSnapshot {
    let phase = match state.phase {
        Phase::Lobby => PhaseSnapshot::Lobby,
        Phase::Dealing => PhaseSnapshot::Dealing,
        Phase::Bidding => snapshot_bidding(state),
        Phase::Playing { trick_no } => snapshot_playing(state, trick_no),
        Phase::RoundScoring => snapshot_scoring(state),
        Phase::GameEnd => PhaseSnapshot::GameEnd(GameEndSnapshot {
            winner: state.winner,
            final_scores: state.scores_total.clone(),
        }),
        Phase::Abandoned => PhaseSnapshot::Abandoned,
    };

    let you = viewer.map(|seat| ViewerState {
        seat,
        hand: state
            .hands
            .get(seat as usize)
            .cloned()
            .unwrap_or_default(),
        legal_bids: match state.turn {
            Some(turn) if turn == seat => legal_bids(state, seat),
            _ => Vec::new(),
        },
        playable: match state.turn {
            Some(turn) if turn == seat => legal_moves(state, seat),
            _ => Vec::new(),
        },
    });

    GameSnapshot {
        version,
        game: header,
        phase,
        you,
    }
}

fn build_round_public(state: &GameState) -> RoundPublic {
    RoundPublic {
        trump: state.round.trump,
        upcard: state.round.upcard,
        bids: state.round.bids.clone(),
        tricks_won: state.round.tricks_won.clone(),
        hand_counts: state.hands.iter().map(|h| h.len() as u8).collect(),
        previous_round: state.round.previous_round.clone(),
    }
}

fn snapshot_bidding(state: &GameState) -> PhaseSnapshot {
    let round = build_round_public(state);
    let to_act = state.turn.unwrap_or(0);
    let range = valid_bid_range(state.hand_size.unwrap_or(0));

    PhaseSnapshot::Bidding(BiddingSnapshot {
        forbidden_bid: forbidden_bid(&state.round.bids, state.hand_size.unwrap_or(0)),
        round,
        to_act,
        min_bid: *range.start(),
        max_bid: *range.end(),
    })
}

fn snapshot_playing(state: &GameState, trick_no: u8) -> PhaseSnapshot {
    let round = build_round_public(state);
    let leader = state.leader.unwrap_or(0);
    let to_act = state.turn.unwrap_or(leader);

    PhaseSnapshot::Playing(TrickSnapshot {
        round,
        trick_no,
        leader,
        to_act,
        current_trick: state.round.trick_plays.clone(),
        last_trick: state.round.last_trick().map(<[_]>::to_vec),
    })
}

fn snapshot_scoring(state: &GameState) -> PhaseSnapshot {
    let round = build_round_public(state);
    // Deltas are presentational here; the lifecycle applies them separately.
    let round_scores = (0..state.player_count as usize)
        .map(|seat| {
            let bid = state.round.bids[seat].unwrap_or(0);
            crate::domain::scoring::round_score(bid, state.round.tricks_won[seat])
        })
        .collect();

    PhaseSnapshot::RoundScoring(ScoringSnapshot {
        round,
        round_scores,
    })
}
