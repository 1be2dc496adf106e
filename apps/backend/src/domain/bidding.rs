//! Bid placement and the hook rule.

use crate::domain::errors::DomainError;
use crate::domain::rules::valid_bid_range;
use crate::domain::state::{
    expected_bidder, next_seat, require_dealer, require_hand_size, require_turn, round_start_seat,
    GameState, Phase, Seat,
};

/// Result of placing a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidOutcome {
    /// Whether every seat has now bid and play begins.
    pub bidding_complete: bool,
}

/// The bid value the final bidder is forbidden to make, if any.
///
/// Only the last seat to bid is constrained: the table's bids may not sum to
/// exactly the tricks available, so at least one player must fail. Returns
/// None when the caller is not the final bidder, or when the prior bids
/// already exceed the hand size (every remaining value is safe then).
pub fn forbidden_bid(bids: &[Option<u8>], hand_size: u8) -> Option<u8> {
    let placed = bids.iter().filter(|b| b.is_some()).count();
    if placed + 1 != bids.len() {
        return None;
    }
    let sum: u8 = bids.iter().flatten().sum();
    // forbidden = hand_size - sum is automatically within 0..=hand_size.
    hand_size.checked_sub(sum)
}

/// Legal bids for a seat, independent of turn enforcement.
pub fn legal_bids(state: &GameState, who: Seat) -> Vec<u8> {
    if state.phase != Phase::Bidding {
        return Vec::new();
    }
    let Some(hand_size) = state.hand_size else {
        return Vec::new();
    };
    // Only a seat that has not bid yet has legal bids.
    match state.round.bids.get(who as usize) {
        Some(None) => {}
        _ => return Vec::new(),
    }
    let hooked = forbidden_bid(&state.round.bids, hand_size);
    valid_bid_range(hand_size)
        .filter(|b| Some(*b) != hooked)
        .collect()
}

/// Place a bid, enforcing phase, turn, range, and the hook rule.
///
/// When the last bid lands, play begins: the seat left of the dealer leads
/// the first trick.
pub fn place_bid(state: &mut GameState, who: Seat, bid: u8) -> Result<BidOutcome, DomainError> {
    if state.phase != Phase::Bidding {
        return Err(DomainError::WrongPhase);
    }

    let turn = require_turn(state, "place_bid")?;
    if turn != who {
        return Err(DomainError::OutOfTurn);
    }

    if state.round.bids[who as usize].is_some() {
        return Err(DomainError::BidAlreadyPlaced);
    }

    let dealer = require_dealer(state, "place_bid")?;
    let placed = state.round.bids.iter().filter(|b| b.is_some()).count() as u8;
    debug_assert_eq!(
        turn,
        expected_bidder(dealer, placed, state.player_count),
        "turn out of sync with bid rotation"
    );

    let hand_size = require_hand_size(state, "place_bid")?;
    if !valid_bid_range(hand_size).contains(&bid) {
        return Err(DomainError::BidOutOfRange { bid, hand_size });
    }

    // Range is checked first; the hook rule only rejects in-range values.
    if let Some(forbidden) = forbidden_bid(&state.round.bids, hand_size) {
        if bid == forbidden {
            return Err(DomainError::BidHooked { forbidden });
        }
    }

    state.round.bids[who as usize] = Some(bid);

    let bidding_complete = state.round.bids.iter().all(Option::is_some);
    if bidding_complete {
        let first = round_start_seat(dealer, state.player_count);
        state.phase = Phase::Playing { trick_no: 1 };
        state.turn = Some(first);
        state.leader = Some(first);
    } else {
        state.turn = Some(next_seat(who, state.player_count));
    }

    Ok(BidOutcome { bidding_complete })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_only_applies_to_last_bidder() {
        // Two of four seats have bid: no constraint yet.
        assert_eq!(forbidden_bid(&[Some(2), Some(1), None, None], 5), None);
        // Three of four: the last bidder may not complete the sum to 5.
        assert_eq!(forbidden_bid(&[Some(2), Some(1), Some(1), None], 5), Some(1));
    }

    #[test]
    fn forbidden_absent_when_prior_bids_exceed_hand_size() {
        assert_eq!(forbidden_bid(&[Some(3), Some(3), None], 5), None);
    }
}
