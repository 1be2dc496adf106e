//! Property-based tests for trick winner resolution.

use proptest::prelude::*;

use crate::domain::domain_prop_helpers::oracle_trick_winner;
use crate::domain::state::RoundState;
use crate::domain::test_gens;
use crate::domain::tricks::resolve_current_trick;
use crate::domain::{card_beats, Trump};

fn round_state_for(plays: &[(u8, crate::domain::Card)], trump: Trump) -> RoundState {
    let mut round = RoundState::empty(plays.len() as u8);
    round.trick_plays = plays.to_vec();
    round.trick_lead = Some(plays[0].1.suit);
    round.trump = Some(trump);
    round
}

proptest! {
    /// The engine's winner always matches the independent oracle.
    #[test]
    fn winner_matches_oracle((plays, trump) in test_gens::complete_trick()) {
        let round = round_state_for(&plays, trump);
        let winner = resolve_current_trick(&round);
        prop_assert!(winner.is_some(), "complete trick must have a winner");

        let oracle_winner = plays[oracle_trick_winner(&plays, trump)].0;
        prop_assert_eq!(winner.unwrap(), oracle_winner,
            "engine and oracle disagree; trump={:?}, plays={:?}", trump, plays);
    }

    /// No play in the trick outranks the declared winner.
    #[test]
    fn winner_is_never_outranked((plays, trump) in test_gens::complete_trick()) {
        let round = round_state_for(&plays, trump);
        let winner = resolve_current_trick(&round).unwrap();
        let lead = plays[0].1.suit;
        let winner_card = plays.iter().find(|(s, _)| *s == winner).unwrap().1;

        for (seat, card) in &plays {
            if *seat != winner {
                prop_assert!(!card_beats(*card, winner_card, lead, trump),
                    "{:?} (seat {}) outranks declared winner {:?}", card, seat, winner_card);
            }
        }
    }

    /// Off-suit non-trump cards never win a trick.
    #[test]
    fn offsuit_non_trump_never_wins((plays, trump) in test_gens::complete_trick()) {
        let round = round_state_for(&plays, trump);
        let winner = resolve_current_trick(&round).unwrap();
        let lead = plays[0].1.suit;
        let winner_card = plays.iter().find(|(s, _)| *s == winner).unwrap().1;

        let follows_lead = winner_card.suit == lead;
        let is_trump = Some(winner_card.suit) == trump.suit();
        prop_assert!(follows_lead || is_trump,
            "winner {:?} neither followed {:?} nor trumped with {:?}", winner_card, lead, trump);
    }

    /// With a trump suit in the trick, the winner is the highest trump.
    #[test]
    fn highest_trump_wins_when_trumped(
        (plays, trump) in test_gens::complete_trick()
            .prop_filter("needs a real trump suit", |(_, t)| t.suit().is_some())
    ) {
        let trump_suit = trump.suit().unwrap();
        let round = round_state_for(&plays, trump);
        let winner = resolve_current_trick(&round).unwrap();
        let winner_card = plays.iter().find(|(s, _)| *s == winner).unwrap().1;

        let trumps: Vec<_> = plays.iter().filter(|(_, c)| c.suit == trump_suit).collect();
        if !trumps.is_empty() {
            prop_assert_eq!(winner_card.suit, trump_suit);
            for (_, card) in &trumps {
                prop_assert!(winner_card.rank >= card.rank);
            }
        }
    }
}
