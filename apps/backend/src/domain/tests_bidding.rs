use crate::domain::bidding::{legal_bids, place_bid};
use crate::domain::dealing::{deal_round, TrumpPolicy};
use crate::domain::state::{round_start_seat, Phase};
use crate::domain::test_state_helpers::bidding_state;
use crate::domain::DomainError;

fn dealt_bidding_state(players: u8, hand_size: u8, dealer: u8) -> crate::domain::GameState {
    let dealt = deal_round(players, hand_size, dealer, 2024, TrumpPolicy::UpCard).unwrap();
    let mut state = bidding_state(dealt.hands, dealer);
    state.round.trump = Some(dealt.trump);
    state.round.upcard = dealt.upcard;
    state
}

#[test]
fn hook_rule_blocks_the_final_bidder() {
    // Hand size 5, bids so far [2, 1, 1]: the last bidder may not bid
    // 5 - 4 = 1, everything else in range is fine.
    let mut state = dealt_bidding_state(4, 5, 3);

    place_bid(&mut state, 0, 2).unwrap();
    place_bid(&mut state, 1, 1).unwrap();
    place_bid(&mut state, 2, 1).unwrap();

    let err = place_bid(&mut state, 3, 1).unwrap_err();
    assert_eq!(err, DomainError::BidHooked { forbidden: 1 });
    // The rejected bid left no trace.
    assert_eq!(state.round.bids[3], None);
    assert_eq!(state.phase, Phase::Bidding);
    assert_eq!(state.turn, Some(3));

    for ok_bid in [0u8, 2, 3, 4, 5] {
        let mut fork = state.clone();
        place_bid(&mut fork, 3, ok_bid).unwrap();
        assert_eq!(fork.round.bids[3], Some(ok_bid));
    }
}

#[test]
fn range_is_checked_before_the_hook() {
    let mut state = dealt_bidding_state(4, 5, 3);
    place_bid(&mut state, 0, 2).unwrap();
    place_bid(&mut state, 1, 1).unwrap();
    place_bid(&mut state, 2, 1).unwrap();

    let err = place_bid(&mut state, 3, 6).unwrap_err();
    assert_eq!(err, DomainError::BidOutOfRange { bid: 6, hand_size: 5 });
}

#[test]
fn earlier_bidders_are_unconstrained_by_the_hook() {
    let mut state = dealt_bidding_state(4, 3, 3);
    // First bidder may bid the full hand size.
    place_bid(&mut state, 0, 3).unwrap();
    // Second may bid 0 even though the sum could still land on 3.
    place_bid(&mut state, 1, 0).unwrap();
    assert_eq!(state.round.bids[..2], [Some(3), Some(0)]);
}

#[test]
fn bidding_rotates_from_left_of_dealer() {
    let mut state = dealt_bidding_state(5, 4, 2);
    assert_eq!(state.turn, Some(3));

    let err = place_bid(&mut state, 0, 1).unwrap_err();
    assert_eq!(err, DomainError::OutOfTurn);

    place_bid(&mut state, 3, 1).unwrap();
    assert_eq!(state.turn, Some(4));
    place_bid(&mut state, 4, 0).unwrap();
    assert_eq!(state.turn, Some(0));
}

#[test]
fn last_bid_starts_play_left_of_dealer() {
    let dealer = 1;
    let mut state = dealt_bidding_state(3, 4, dealer);
    place_bid(&mut state, 2, 1).unwrap();
    place_bid(&mut state, 0, 1).unwrap();
    // Forbidden for the dealer is 4 - 2 = 2.
    place_bid(&mut state, dealer, 1).unwrap();

    assert_eq!(state.phase, Phase::Playing { trick_no: 1 });
    let first = round_start_seat(dealer, 3);
    assert_eq!(state.turn, Some(first));
    assert_eq!(state.leader, Some(first));
}

#[test]
fn bids_are_immutable_once_placed() {
    let mut state = dealt_bidding_state(4, 5, 3);
    place_bid(&mut state, 0, 2).unwrap();

    // Force the turn back to a seat that already bid; the bid must stay.
    state.turn = Some(0);
    let err = place_bid(&mut state, 0, 4).unwrap_err();
    assert_eq!(err, DomainError::BidAlreadyPlaced);
    assert_eq!(state.round.bids[0], Some(2));
}

#[test]
fn bidding_rejected_outside_bidding_phase() {
    let mut state = dealt_bidding_state(4, 5, 3);
    state.phase = Phase::Playing { trick_no: 1 };
    assert_eq!(place_bid(&mut state, 0, 2).unwrap_err(), DomainError::WrongPhase);
}

#[test]
fn legal_bids_omit_only_the_hooked_value() {
    let mut state = dealt_bidding_state(4, 5, 3);
    place_bid(&mut state, 0, 2).unwrap();
    place_bid(&mut state, 1, 1).unwrap();
    place_bid(&mut state, 2, 1).unwrap();

    assert_eq!(legal_bids(&state, 3), vec![0, 2, 3, 4, 5]);
    // A seat that already bid has nothing legal left.
    assert!(legal_bids(&state, 0).is_empty());
}
