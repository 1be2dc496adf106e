//! Round scoring and end-of-game winner selection.

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::state::{
    require_hand_size, require_round_no, GameState, Phase, PreviousRound, Seat,
};

/// End-of-game tie-break rule. Configuration, fixed per engine instance.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Fewest rounds with a missed bid wins; lowest seat if still tied.
    FewestBidMisses,
    /// Lowest seat wins outright.
    LowestSeat,
}

/// Score delta for one seat's round: `10 + bid` on the nose, a linear
/// penalty per trick of error otherwise. Pure and total; no floor.
pub fn round_score(bid: u8, tricks_won: u8) -> i32 {
    if bid == tricks_won {
        10 + bid as i32
    } else {
        -((bid as i32 - tricks_won as i32).abs())
    }
}

/// Per-seat score deltas for a completed round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundScoreResult {
    pub round_no: u8,
    pub deltas: Vec<i32>,
}

/// Tally the completed round into cumulative scores.
///
/// Must run exactly once per round, while the state sits in RoundScoring;
/// records the round summary for transition displays. The tricks-won sum is
/// re-checked against the hand size first, because scoring a miscounted
/// round would corrupt every total from here on.
pub fn apply_round_scoring(state: &mut GameState) -> Result<RoundScoreResult, DomainError> {
    if state.phase != Phase::RoundScoring {
        return Err(DomainError::WrongPhase);
    }
    let round_no = require_round_no(state, "apply_round_scoring")?;
    let hand_size = require_hand_size(state, "apply_round_scoring")?;

    let tricks_sum: u8 = state.round.tricks_won.iter().sum();
    if tricks_sum != hand_size {
        return Err(DomainError::invariant(format!(
            "round {round_no}: tricks_won sums to {tricks_sum}, hand size is {hand_size}"
        )));
    }

    let mut deltas = Vec::with_capacity(state.player_count as usize);
    for seat in 0..state.player_count as usize {
        let bid = state.round.bids[seat].ok_or_else(|| {
            DomainError::invariant(format!("round {round_no}: seat {seat} has no bid at scoring"))
        })?;
        let tricks = state.round.tricks_won[seat];
        let delta = round_score(bid, tricks);
        state.scores_total[seat] += delta;
        if bid != tricks {
            state.bid_misses[seat] += 1;
        }
        deltas.push(delta);
    }

    state.round.previous_round = Some(PreviousRound {
        round_no,
        hand_size,
        bids: state.round.bids.clone(),
        tricks_won: state.round.tricks_won.clone(),
        score_deltas: deltas.clone(),
    });

    Ok(RoundScoreResult { round_no, deltas })
}

/// Winner of a finished game: maximum total score, ties broken by the
/// configured rule, deterministically.
pub fn game_winner(state: &GameState, tie_break: TieBreak) -> Seat {
    let best_score = state.scores_total.iter().copied().max().unwrap_or(0);
    let tied = (0..state.player_count as usize).filter(|&s| state.scores_total[s] == best_score);

    let winner = match tie_break {
        TieBreak::FewestBidMisses => tied.min_by_key(|&s| (state.bid_misses[s], s)),
        TieBreak::LowestSeat => tied.min(),
    };
    winner.unwrap_or(0) as Seat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_bid_pays_ten_plus_bid() {
        for bid in 0..=13u8 {
            assert_eq!(round_score(bid, bid), 10 + bid as i32);
        }
    }

    #[test]
    fn misses_cost_one_per_trick_of_error() {
        assert_eq!(round_score(3, 1), -2);
        assert_eq!(round_score(0, 4), -4);
        assert_eq!(round_score(5, 6), -1);
    }

    #[test]
    fn miss_is_always_negative_and_symmetric() {
        for bid in 0..=7u8 {
            for tricks in 0..=7u8 {
                if bid != tricks {
                    let s = round_score(bid, tricks);
                    assert!(s < 0);
                    assert_eq!(s, round_score(tricks, bid));
                }
            }
        }
    }
}
