use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::{Card, Suit, Trump};

/// Positional index into the fixed turn order (0..player_count).
pub type Seat = u8;

/// Overall game progression phases.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Players joining; turn order not yet fixed.
    Lobby,
    /// Hands being dealt and trump established. Transient: the engine deals
    /// and moves to Bidding within the same command.
    Dealing,
    /// Players place bids in fixed turn order.
    Bidding,
    /// Playing tricks within the round; `trick_no` is 1-based.
    Playing { trick_no: u8 },
    /// Round finished; scores being tallied. Transient like Dealing.
    RoundScoring,
    /// All scheduled rounds complete.
    GameEnd,
    /// Poisoned by an invariant violation; rejects every command.
    Abandoned,
}

/// Per-round state relevant during bidding and trick play.
#[derive(Debug, Clone)]
pub struct RoundState {
    /// Ordered plays for the current trick (who, card).
    pub trick_plays: Vec<(Seat, Card)>,
    /// Lead suit for the current trick.
    pub trick_lead: Option<Suit>,
    /// Completed tricks of this round, in play order. Together with hands and
    /// the current trick these account for every dealt card.
    pub resolved: Vec<Vec<(Seat, Card)>>,
    /// Tricks won per seat this round.
    pub tricks_won: Vec<u8>,
    /// Bids per seat.
    pub bids: Vec<Option<u8>>,
    /// Trump for this round.
    pub trump: Option<Trump>,
    /// The turned card that fixed trump, when the policy turns one.
    pub upcard: Option<Card>,
    /// Summary of the most recently completed round, if any.
    pub previous_round: Option<PreviousRound>,
}

impl RoundState {
    pub fn empty(player_count: u8) -> Self {
        let n = player_count as usize;
        Self {
            trick_plays: Vec::with_capacity(n),
            trick_lead: None,
            resolved: Vec::new(),
            tricks_won: vec![0; n],
            bids: vec![None; n],
            trump: None,
            upcard: None,
            previous_round: None,
        }
    }

    /// Last completed trick, for display purposes.
    pub fn last_trick(&self) -> Option<&[(Seat, Card)]> {
        self.resolved.last().map(Vec::as_slice)
    }
}

/// Final state of a completed round, kept for transition displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousRound {
    pub round_no: u8,
    pub hand_size: u8,
    pub bids: Vec<Option<u8>>,
    pub tricks_won: Vec<u8>,
    pub score_deltas: Vec<i32>,
}

/// Entire game container, sufficient for pure domain operations.
///
/// The sync layer owns exactly one of these per game and serializes every
/// mutation through it.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seats in the fixed turn order. Zero while in Lobby.
    pub player_count: u8,
    pub phase: Phase,
    /// 1-based index into the hand-size schedule.
    pub round_no: Option<u8>,
    /// Cards dealt to each seat this round.
    pub hand_size: Option<u8>,
    /// Hands by seat.
    pub hands: Vec<Vec<Card>>,
    /// Dealer seat for the current round.
    pub dealer: Option<Seat>,
    /// Seat expected to act. None when nobody can act (Lobby, transient
    /// phases, GameEnd).
    pub turn: Option<Seat>,
    /// Seat leading the current trick (Playing phase only).
    pub leader: Option<Seat>,
    /// Cumulative scores across rounds.
    pub scores_total: Vec<i32>,
    /// Rounds in which each seat missed its bid; feeds the tie-break.
    pub bid_misses: Vec<u32>,
    /// Winner, recorded when the game ends.
    pub winner: Option<Seat>,
    /// Per-round container.
    pub round: RoundState,
}

impl GameState {
    /// Fresh game waiting for players.
    pub fn lobby() -> Self {
        Self {
            player_count: 0,
            phase: Phase::Lobby,
            round_no: None,
            hand_size: None,
            hands: Vec::new(),
            dealer: None,
            turn: None,
            leader: None,
            scores_total: Vec::new(),
            bid_misses: Vec::new(),
            winner: None,
            round: RoundState::empty(0),
        }
    }

    /// Fix the turn order and leave the lobby. The first round is dealt by
    /// the round lifecycle, not here.
    pub fn begin(&mut self, player_count: u8) {
        let n = player_count as usize;
        self.player_count = player_count;
        self.phase = Phase::Dealing;
        self.hands = vec![Vec::new(); n];
        self.scores_total = vec![0; n];
        self.bid_misses = vec![0; n];
        self.round = RoundState::empty(player_count);
    }
}

/// Seat / turn math for a table of `count` seats.
///
/// These live in `domain` so every layer shares one source of truth for
/// rotation and "who acts next". Clockwise is positive.
#[inline]
pub fn seat_offset(seat: Seat, delta: i16, count: u8) -> Seat {
    debug_assert!(count > 0, "seat math needs a seated table");
    let n = count as i16;
    ((seat as i16 + delta).rem_euclid(n)) as Seat
}

/// Next seat clockwise.
#[inline]
pub fn next_seat(seat: Seat, count: u8) -> Seat {
    seat_offset(seat, 1, count)
}

/// Seat `n` steps clockwise from `start`.
#[inline]
pub fn nth_from(start: Seat, n: u8, count: u8) -> Seat {
    seat_offset(start, n as i16, count)
}

/// Round-start seat (left of the dealer): first bidder and first leader.
#[inline]
pub fn round_start_seat(dealer: Seat, count: u8) -> Seat {
    next_seat(dealer, count)
}

/// Dealer seat for a 1-based round number; rotates one seat per round.
#[inline]
pub fn dealer_for_round(starting_dealer: Seat, round_no: u8, count: u8) -> Seat {
    debug_assert!(round_no >= 1, "round_no is 1-based");
    nth_from(starting_dealer, (round_no - 1) % count, count)
}

/// Expected bidder seat after `bid_count` bids have been placed.
#[inline]
pub fn expected_bidder(dealer: Seat, bid_count: u8, count: u8) -> Seat {
    seat_offset(dealer, 1 + bid_count as i16, count)
}

pub fn require_round_no(state: &GameState, ctx: &'static str) -> Result<u8, DomainError> {
    state
        .round_no
        .ok_or_else(|| DomainError::invariant(format!("round_no must be set ({ctx})")))
}

pub fn require_hand_size(state: &GameState, ctx: &'static str) -> Result<u8, DomainError> {
    state
        .hand_size
        .ok_or_else(|| DomainError::invariant(format!("hand_size must be set ({ctx})")))
}

pub fn require_dealer(state: &GameState, ctx: &'static str) -> Result<Seat, DomainError> {
    state
        .dealer
        .ok_or_else(|| DomainError::invariant(format!("dealer must be set ({ctx})")))
}

pub fn require_turn(state: &GameState, ctx: &'static str) -> Result<Seat, DomainError> {
    state
        .turn
        .ok_or_else(|| DomainError::invariant(format!("turn must be set ({ctx})")))
}

pub fn require_leader(state: &GameState, ctx: &'static str) -> Result<Seat, DomainError> {
    state
        .leader
        .ok_or_else(|| DomainError::invariant(format!("leader must be set ({ctx})")))
}

/// Card conservation: within a round, hands + current trick + resolved
/// tricks must account for exactly `hand_size * player_count` cards.
///
/// Violations are fatal; the caller is expected to abandon the game.
pub fn check_card_conservation(state: &GameState) -> Result<(), DomainError> {
    if !matches!(
        state.phase,
        Phase::Bidding | Phase::Playing { .. } | Phase::RoundScoring
    ) {
        return Ok(());
    }
    let hand_size = require_hand_size(state, "card conservation")?;
    let expected = hand_size as usize * state.player_count as usize;
    let in_hands: usize = state.hands.iter().map(Vec::len).sum();
    let in_trick = state.round.trick_plays.len();
    let in_resolved: usize = state.round.resolved.iter().map(Vec::len).sum();
    let total = in_hands + in_trick + in_resolved;
    if total != expected {
        return Err(DomainError::invariant(format!(
            "card conservation broken: {in_hands} in hands + {in_trick} in trick + {in_resolved} resolved = {total}, expected {expected}"
        )));
    }
    let tricks_resolved: u8 = state.round.tricks_won.iter().sum();
    if tricks_resolved as usize != state.round.resolved.len() {
        return Err(DomainError::invariant(format!(
            "tricks_won sums to {tricks_resolved} but {} tricks are resolved",
            state.round.resolved.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_math_wraps_for_any_table_size() {
        for count in 3..=7u8 {
            assert_eq!(next_seat(count - 1, count), 0);
            assert_eq!(seat_offset(0, -1, count), count - 1);
            assert_eq!(nth_from(0, count, count), 0);
        }
    }

    #[test]
    fn dealer_rotates_one_seat_per_round() {
        assert_eq!(dealer_for_round(0, 1, 5), 0);
        assert_eq!(dealer_for_round(0, 2, 5), 1);
        assert_eq!(dealer_for_round(0, 6, 5), 0);
        assert_eq!(dealer_for_round(3, 2, 4), 0);
    }

    #[test]
    fn bidding_starts_left_of_dealer() {
        assert_eq!(expected_bidder(2, 0, 4), 3);
        assert_eq!(expected_bidder(2, 1, 4), 0);
        // The dealer bids last.
        assert_eq!(expected_bidder(2, 3, 4), 2);
    }
}
