//! Builders for mid-round game states used across the domain tests.

use crate::domain::state::{round_start_seat, GameState, Phase, RoundState, Seat};
use crate::domain::{Card, Trump};

/// Game state at the top of a round, in the Bidding phase, with the given
/// hands. All hands must be the same length.
pub fn bidding_state(hands: Vec<Vec<Card>>, dealer: Seat) -> GameState {
    let player_count = hands.len() as u8;
    let hand_size = hands[0].len() as u8;
    assert!(
        hands.iter().all(|h| h.len() == hand_size as usize),
        "uneven hands in test setup"
    );

    let mut state = GameState::lobby();
    state.begin(player_count);
    state.phase = Phase::Bidding;
    state.round_no = Some(1);
    state.hand_size = Some(hand_size);
    state.hands = hands;
    state.dealer = Some(dealer);
    state.turn = Some(round_start_seat(dealer, player_count));
    state.leader = None;
    state.round = RoundState::empty(player_count);
    state
}

/// Same, but with every bid placed and the first trick ready to play.
pub fn playing_state(
    hands: Vec<Vec<Card>>,
    dealer: Seat,
    bids: &[u8],
    trump: Trump,
) -> GameState {
    let mut state = bidding_state(hands, dealer);
    assert_eq!(bids.len(), state.player_count as usize);

    state.round.bids = bids.iter().map(|&b| Some(b)).collect();
    state.round.trump = Some(trump);
    let first = round_start_seat(dealer, state.player_count);
    state.phase = Phase::Playing { trick_no: 1 };
    state.turn = Some(first);
    state.leader = Some(first);
    state
}
