use crate::domain::cards::parse_cards;
use crate::domain::state::Phase;
use crate::domain::test_state_helpers::playing_state;
use crate::domain::tricks::{legal_moves, play_card, resolve_current_trick};
use crate::domain::{DomainError, Trump};

/// Hand size 3, dealer at seat 3 so seat 0 leads. Seat 1 holds no spades.
fn spades_lead_state(trump: Trump) -> crate::domain::GameState {
    let hands = vec![
        parse_cards(&["5S", "2C", "3C"]),
        parse_cards(&["2H", "4D", "6D"]),
        parse_cards(&["KS", "7C", "8C"]),
        parse_cards(&["9S", "TD", "JD"]),
    ];
    playing_state(hands, 3, &[1, 1, 0, 0], trump)
}

#[test]
fn low_trump_beats_high_offsuit_cards() {
    // Spades led; the two of hearts is trump and outranks the king and
    // nine of spades.
    let mut state = spades_lead_state(Trump::Hearts);

    play_card(&mut state, 0, parse_cards(&["5S"])[0]).unwrap();
    play_card(&mut state, 1, parse_cards(&["2H"])[0]).unwrap();
    play_card(&mut state, 2, parse_cards(&["KS"])[0]).unwrap();
    let result = play_card(&mut state, 3, parse_cards(&["9S"])[0]).unwrap();

    assert!(result.trick_completed);
    assert_eq!(result.trick_winner, Some(1));
    assert_eq!(state.round.tricks_won, vec![0, 1, 0, 0]);
    // The winner leads the next trick.
    assert_eq!(state.turn, Some(1));
    assert_eq!(state.leader, Some(1));
    assert_eq!(state.phase, Phase::Playing { trick_no: 2 });
}

#[test]
fn highest_lead_suit_card_wins_without_trump() {
    let mut state = spades_lead_state(Trump::NoTrump);

    play_card(&mut state, 0, parse_cards(&["5S"])[0]).unwrap();
    play_card(&mut state, 1, parse_cards(&["2H"])[0]).unwrap();
    play_card(&mut state, 2, parse_cards(&["KS"])[0]).unwrap();
    let result = play_card(&mut state, 3, parse_cards(&["9S"])[0]).unwrap();

    assert_eq!(result.trick_winner, Some(2));
}

#[test]
fn must_follow_suit_when_able() {
    let mut state = spades_lead_state(Trump::Hearts);
    play_card(&mut state, 0, parse_cards(&["5S"])[0]).unwrap();
    play_card(&mut state, 1, parse_cards(&["2H"])[0]).unwrap();

    // Seat 2 holds the king of spades and may not discard a club.
    let err = play_card(&mut state, 2, parse_cards(&["7C"])[0]).unwrap_err();
    assert_eq!(err, DomainError::MustFollowSuit);
    // The illegal play never entered the trick.
    assert_eq!(state.round.trick_plays.len(), 2);
    assert_eq!(state.hands[2].len(), 3);
    assert_eq!(state.turn, Some(2));
}

#[test]
fn void_in_lead_suit_frees_the_whole_hand() {
    let mut state = spades_lead_state(Trump::Hearts);
    play_card(&mut state, 0, parse_cards(&["5S"])[0]).unwrap();

    // Seat 1 has no spades: every card is legal, trump or not.
    let legal = legal_moves(&state, 1);
    assert_eq!(legal.len(), 3);
    play_card(&mut state, 1, parse_cards(&["4D"])[0]).unwrap();
}

#[test]
fn leader_may_open_with_any_card() {
    let state = spades_lead_state(Trump::Hearts);
    assert_eq!(legal_moves(&state, 0).len(), 3);
}

#[test]
fn playing_a_card_not_held_is_rejected() {
    let mut state = spades_lead_state(Trump::Hearts);
    let err = play_card(&mut state, 0, parse_cards(&["AS"])[0]).unwrap_err();
    assert_eq!(err, DomainError::CardNotInHand);
}

#[test]
fn out_of_turn_plays_are_rejected() {
    let mut state = spades_lead_state(Trump::Hearts);
    let err = play_card(&mut state, 2, parse_cards(&["KS"])[0]).unwrap_err();
    assert_eq!(err, DomainError::OutOfTurn);
    assert!(state.round.trick_plays.is_empty());
}

#[test]
fn plays_are_rejected_outside_the_playing_phase() {
    let mut state = spades_lead_state(Trump::Hearts);
    state.phase = Phase::Bidding;
    let err = play_card(&mut state, 0, parse_cards(&["5S"])[0]).unwrap_err();
    assert_eq!(err, DomainError::WrongPhase);
}

#[test]
fn final_trick_moves_the_round_to_scoring() {
    let hands = vec![
        parse_cards(&["5S"]),
        parse_cards(&["2H"]),
        parse_cards(&["KS"]),
    ];
    let mut state = playing_state(hands, 2, &[1, 0, 0], Trump::Clubs);

    play_card(&mut state, 0, parse_cards(&["5S"])[0]).unwrap();
    play_card(&mut state, 1, parse_cards(&["2H"])[0]).unwrap();
    let result = play_card(&mut state, 2, parse_cards(&["KS"])[0]).unwrap();

    assert!(result.trick_completed);
    assert!(result.round_complete);
    assert_eq!(result.trick_winner, Some(2));
    assert_eq!(state.phase, Phase::RoundScoring);
    assert_eq!(state.turn, None);
    assert_eq!(state.leader, None);
    assert!(state.hands.iter().all(Vec::is_empty));
    assert_eq!(state.round.resolved.len(), 1);
}

#[test]
fn incomplete_trick_has_no_winner() {
    let mut state = spades_lead_state(Trump::Hearts);
    play_card(&mut state, 0, parse_cards(&["5S"])[0]).unwrap();
    assert_eq!(resolve_current_trick(&state.round), None);
}
