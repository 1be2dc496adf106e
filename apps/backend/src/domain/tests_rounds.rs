//! Whole-round flow: deal, bid, play every trick, score.

use crate::domain::bidding::{legal_bids, place_bid};
use crate::domain::dealing::{deal_round, TrumpPolicy};
use crate::domain::scoring::{apply_round_scoring, game_winner, round_score, TieBreak};
use crate::domain::state::{check_card_conservation, require_turn, Phase};
use crate::domain::test_state_helpers::bidding_state;
use crate::domain::tricks::{legal_moves, play_card};
use crate::domain::{DomainError, GameState};

/// Deal a round and drive it to completion with lowest-legal choices.
fn play_full_round(players: u8, hand_size: u8, seed: u64) -> GameState {
    let dealer = 0;
    let dealt = deal_round(players, hand_size, dealer, seed, TrumpPolicy::UpCard).unwrap();
    let mut state = bidding_state(dealt.hands, dealer);
    state.round.trump = Some(dealt.trump);
    state.round.upcard = dealt.upcard;

    for _ in 0..players {
        let who = require_turn(&state, "test bidding").unwrap();
        let bid = *legal_bids(&state, who).first().expect("some bid is legal");
        place_bid(&mut state, who, bid).unwrap();
    }
    assert_eq!(state.phase, Phase::Playing { trick_no: 1 });

    let expected_total = hand_size as usize * players as usize;
    for _ in 0..expected_total {
        check_card_conservation(&state).unwrap();
        let who = require_turn(&state, "test playing").unwrap();
        let card = *legal_moves(&state, who).first().expect("some card is legal");
        play_card(&mut state, who, card).unwrap();
    }

    assert_eq!(state.phase, Phase::RoundScoring);
    state
}

#[test]
fn every_table_size_plays_a_clean_round() {
    for players in 3..=7u8 {
        let state = play_full_round(players, 4, 99 + players as u64);
        let tricks: u8 = state.round.tricks_won.iter().sum();
        assert_eq!(tricks, 4, "{players} players: tricks must sum to hand size");
        assert!(state.hands.iter().all(Vec::is_empty));
    }
}

#[test]
fn scoring_applies_the_bid_accuracy_formula() {
    let mut state = play_full_round(4, 5, 7);
    let bids: Vec<u8> = state.round.bids.iter().map(|b| b.unwrap()).collect();
    let tricks = state.round.tricks_won.clone();

    let result = apply_round_scoring(&mut state).unwrap();
    for seat in 0..4 {
        let expected = round_score(bids[seat], tricks[seat]);
        assert_eq!(result.deltas[seat], expected);
        assert_eq!(state.scores_total[seat], expected);
        assert_eq!(state.bid_misses[seat], u32::from(bids[seat] != tricks[seat]));
    }

    let prev = state.round.previous_round.as_ref().unwrap();
    assert_eq!(prev.round_no, 1);
    assert_eq!(prev.score_deltas, result.deltas);
}

#[test]
fn scoring_outside_round_scoring_phase_is_rejected() {
    let mut state = play_full_round(3, 2, 11);
    state.phase = Phase::GameEnd;
    assert_eq!(
        apply_round_scoring(&mut state).unwrap_err(),
        DomainError::WrongPhase
    );
}

#[test]
fn miscounted_tricks_are_fatal_not_scored() {
    let mut state = play_full_round(4, 3, 13);
    state.round.tricks_won[0] += 1; // break the invariant deliberately

    let scores_before = state.scores_total.clone();
    let err = apply_round_scoring(&mut state).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(state.scores_total, scores_before, "scores must not change");
}

#[test]
fn conservation_check_catches_duplicated_cards() {
    let mut state = play_full_round(4, 3, 17);
    let resurrected = state.round.resolved[0][0].1;
    state.hands[0].push(resurrected);
    assert!(check_card_conservation(&state).unwrap_err().is_fatal());
}

#[test]
fn winner_is_the_top_scorer() {
    let mut state = GameState::lobby();
    state.begin(4);
    state.scores_total = vec![12, 30, -4, 9];
    assert_eq!(game_winner(&state, TieBreak::FewestBidMisses), 1);
}

#[test]
fn score_ties_fall_back_to_fewest_bid_misses_then_seat() {
    let mut state = GameState::lobby();
    state.begin(4);
    state.scores_total = vec![20, 20, 20, 5];
    state.bid_misses = vec![3, 1, 1, 0];

    // Seats 1 and 2 tie on misses; the lower seat wins.
    assert_eq!(game_winner(&state, TieBreak::FewestBidMisses), 1);
    assert_eq!(game_winner(&state, TieBreak::LowestSeat), 0);
}
