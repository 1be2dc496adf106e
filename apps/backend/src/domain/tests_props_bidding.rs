//! Property-based tests for the hook rule and scoring formula.

use proptest::prelude::*;

use crate::domain::bidding::place_bid;
use crate::domain::dealing::{deal_round, TrumpPolicy};
use crate::domain::scoring::round_score;
use crate::domain::test_state_helpers::bidding_state;
use crate::domain::DomainError;

/// Arbitrary table with everyone but the dealer already committed to a bid.
fn final_bidder_setup() -> impl Strategy<Value = (u8, u8, Vec<u8>)> {
    (3u8..=7, 1u8..=7).prop_flat_map(|(players, hand_size)| {
        proptest::collection::vec(0..=hand_size, (players - 1) as usize)
            .prop_map(move |priors| (players, hand_size, priors))
    })
}

proptest! {
    /// The final bidder is rejected exactly on `hand_size - sum(priors)`
    /// and accepted on every other in-range value.
    #[test]
    fn hook_rule_rejects_exactly_the_completing_bid(
        (players, hand_size, priors) in final_bidder_setup(),
        last_bid in 0u8..=7,
    ) {
        prop_assume!(last_bid <= hand_size);

        let dealer = players - 1;
        let dealt = deal_round(players, hand_size, dealer, 1, TrumpPolicy::UpCard).unwrap();
        let mut state = bidding_state(dealt.hands, dealer);
        // Everyone from left of dealer around to the dealer has bid.
        for (i, &bid) in priors.iter().enumerate() {
            state.round.bids[i] = Some(bid);
        }
        state.turn = Some(dealer);

        let sum: u8 = priors.iter().sum();
        let forbidden = hand_size.checked_sub(sum);

        let result = place_bid(&mut state, dealer, last_bid);
        if Some(last_bid) == forbidden {
            prop_assert_eq!(result.unwrap_err(),
                DomainError::BidHooked { forbidden: last_bid });
            prop_assert_eq!(state.round.bids[dealer as usize], None);
        } else {
            prop_assert!(result.is_ok(), "bid {} with priors {:?} (hand {}) must pass",
                last_bid, priors, hand_size);
        }
    }

    /// `score == 10 + bid` exactly on the bid; every miss is the negative
    /// absolute error.
    #[test]
    fn scoring_formula_shape(bid in 0u8..=13, tricks in 0u8..=13) {
        let score = round_score(bid, tricks);
        if bid == tricks {
            prop_assert_eq!(score, 10 + bid as i32);
        } else {
            prop_assert!(score < 0);
            prop_assert_eq!(score, -((bid as i32 - tricks as i32).abs()));
        }
    }
}
