//! Lowest-legal policy: bid as little as allowed, shed the lowest card.
//!
//! This is the default action applied for disconnected players once the
//! configured grace period expires.

use super::trait_def::{Policy, PolicyError};
use crate::domain::bidding::legal_bids;
use crate::domain::state::Seat;
use crate::domain::tricks::legal_moves;
use crate::domain::{Card, GameState};

pub struct LowestLegal;

impl Policy for LowestLegal {
    fn choose_bid(&self, state: &GameState, seat: Seat) -> Result<u8, PolicyError> {
        // legal_bids is sorted ascending, so the first entry is 0 unless the
        // hook rule forbids it.
        legal_bids(state, seat)
            .first()
            .copied()
            .ok_or(PolicyError::NoLegalAction)
    }

    fn choose_play(&self, state: &GameState, seat: Seat) -> Result<Card, PolicyError> {
        legal_moves(state, seat)
            .first()
            .copied()
            .ok_or(PolicyError::NoLegalAction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards::parse_cards;
    use crate::domain::test_state_helpers::{bidding_state, playing_state};
    use crate::domain::tricks::play_card;
    use crate::domain::Trump;

    #[test]
    fn bids_zero_unless_hooked() {
        let hands = vec![
            parse_cards(&["2C", "3C"]),
            parse_cards(&["4D", "5D"]),
            parse_cards(&["6H", "7H"]),
        ];
        let mut state = bidding_state(hands, 2);
        assert_eq!(LowestLegal.choose_bid(&state, 0), Ok(0));

        // Make 0 the forbidden value for the last bidder: priors sum to 2.
        state.round.bids[0] = Some(1);
        state.round.bids[1] = Some(1);
        state.turn = Some(2);
        assert_eq!(LowestLegal.choose_bid(&state, 2), Ok(1));
    }

    #[test]
    fn follows_suit_with_the_lowest_card() {
        let hands = vec![
            parse_cards(&["2H", "9S"]),
            parse_cards(&["4S", "KS"]),
            parse_cards(&["6D", "7D"]),
        ];
        let mut state = playing_state(hands, 2, &[0, 1, 0], Trump::Clubs);
        play_card(&mut state, 0, parse_cards(&["9S"])[0]).unwrap();

        // Seat 1 must follow spades; the lowest spade is the 4.
        assert_eq!(LowestLegal.choose_play(&state, 1), Ok(parse_cards(&["4S"])[0]));
        // Seat 2 is void in spades; its lowest card overall is legal.
        play_card(&mut state, 1, parse_cards(&["4S"])[0]).unwrap();
        assert_eq!(LowestLegal.choose_play(&state, 2), Ok(parse_cards(&["6D"])[0]));
    }
}
