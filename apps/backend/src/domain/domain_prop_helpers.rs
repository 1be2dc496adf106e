//! Independent oracle implementations for property tests.

use crate::domain::state::Seat;
use crate::domain::{Card, Trump};

/// Reference trick winner: index into `plays` of the winning play.
///
/// Deliberately written differently from the engine's pairwise comparison:
/// collect the candidate set (trumps if any were played, else lead-suit
/// cards) and take the highest rank.
pub fn oracle_trick_winner(plays: &[(Seat, Card)], trump: Trump) -> usize {
    let lead = plays[0].1.suit;

    let candidates: Vec<usize> = match trump.suit() {
        Some(trump_suit) if plays.iter().any(|(_, c)| c.suit == trump_suit) => plays
            .iter()
            .enumerate()
            .filter(|(_, (_, c))| c.suit == trump_suit)
            .map(|(i, _)| i)
            .collect(),
        _ => plays
            .iter()
            .enumerate()
            .filter(|(_, (_, c))| c.suit == lead)
            .map(|(i, _)| i)
            .collect(),
    };

    candidates
        .into_iter()
        .max_by_key(|&i| plays[i].1.rank)
        .expect("the lead card is always a candidate")
}
