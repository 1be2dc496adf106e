//! Proptest strategies for domain inputs.

use proptest::prelude::*;

use crate::domain::dealing::shuffled_deck;
use crate::domain::state::Seat;
use crate::domain::{Card, Trump};

pub fn any_trump() -> impl Strategy<Value = Trump> {
    prop_oneof![
        Just(Trump::Clubs),
        Just(Trump::Diamonds),
        Just(Trump::Hearts),
        Just(Trump::Spades),
        Just(Trump::NoTrump),
    ]
}

/// A complete trick at a 3..=7 seat table: distinct cards, seats rotating
/// from a random leader, plus a trump. The first play is the lead.
pub fn complete_trick() -> impl Strategy<Value = (Vec<(Seat, Card)>, Trump)> {
    (3usize..=7).prop_flat_map(|n| {
        (
            proptest::sample::subsequence(shuffled_deck(0), n),
            0u8..n as u8,
            any_trump(),
        )
            .prop_map(move |(cards, leader, trump)| {
                let plays = cards
                    .into_iter()
                    .enumerate()
                    .map(|(i, card)| (((leader as usize + i) % n) as Seat, card))
                    .collect();
                (plays, trump)
            })
    })
}
