//! Synchronization guarantees: idempotent commands, reconnection,
//! per-seat redaction, and invariant-violation lockout.

mod common;

use backend::domain::snapshot::PhaseSnapshot;
use backend::domain::state::require_turn;
use backend::domain::tricks::legal_moves;
use backend::domain::{DomainError, Phase};
use common::Table;

#[test]
fn replayed_commands_are_noops_with_the_same_version() {
    let mut table = Table::join(4);
    table.start();

    let seat = require_turn(&table.session.state, "test").unwrap();
    let player = table.ids[seat as usize];
    let outcome = table
        .flow
        .place_bid(&mut table.session, player, 1, 1)
        .unwrap();
    assert!(!outcome.duplicate);
    let version_after = outcome.version;
    let bids_after = table.session.state.round.bids.clone();

    // Same idempotency key again: no mutation, same resulting version.
    let replay = table
        .flow
        .place_bid(&mut table.session, player, 1, 1)
        .unwrap();
    assert!(replay.duplicate);
    assert_eq!(replay.version, version_after);
    assert!(replay.events.is_empty());
    assert_eq!(table.session.state.round.bids.clone(), bids_after);
    assert_eq!(table.session.version, version_after);
}

#[test]
fn replayed_play_card_does_not_mutate_twice() {
    let mut table = Table::join(4);
    table.start();
    // Finish bidding.
    for _ in 0..4 {
        table.act_current();
    }
    assert!(matches!(table.session.state.phase, Phase::Playing { .. }));

    let seat = require_turn(&table.session.state, "test").unwrap();
    let player = table.ids[seat as usize];
    let card = legal_moves(&table.session.state, seat)[0];
    let seq = table.next_seq(seat as usize);

    let first = table
        .flow
        .play_card(&mut table.session, player, seq, card)
        .unwrap();
    let hand_len = table.session.state.hands[seat as usize].len();

    let replay = table
        .flow
        .play_card(&mut table.session, player, seq, card)
        .unwrap();
    assert!(replay.duplicate);
    assert_eq!(replay.version, first.version);
    assert_eq!(table.session.state.hands[seat as usize].len(), hand_len);
    assert_eq!(table.session.state.round.trick_plays.len(), 1);
}

#[test]
fn disconnect_keeps_the_seat_mid_game() {
    let mut table = Table::join(3);
    table.start();

    let gone = table.ids[2];
    let outcome = table.flow.leave_game(&mut table.session, gone).unwrap();
    assert!(!outcome.duplicate);
    assert_eq!(table.session.roster.len(), 3, "seat must survive");
    assert!(!table.session.player(gone).unwrap().connected);

    // Leaving again is a no-op.
    let again = table.flow.leave_game(&mut table.session, gone).unwrap();
    assert!(again.duplicate);
}

#[test]
fn leaving_the_lobby_releases_the_seat_and_the_host() {
    let mut table = Table::join(3);
    let host = table.ids[0];
    table.flow.leave_game(&mut table.session, host).unwrap();

    assert_eq!(table.session.roster.len(), 2);
    assert_eq!(table.session.host, Some(table.ids[1]));
}

#[test]
fn reconnection_reattaches_without_mutating_the_round() {
    let mut table = Table::join(3);
    table.start();

    let gone = table.ids[1];
    table.flow.leave_game(&mut table.session, gone).unwrap();
    let hands_before = table.session.state.hands.clone();
    let turn_before = table.session.state.turn;

    let outcome = table
        .flow
        .join_game(&mut table.session, gone, "player-1".into())
        .unwrap();
    assert!(outcome.rejoined);
    assert!(table.session.player(gone).unwrap().connected);
    // Reconnect touches the connection flag, never the game state.
    assert_eq!(table.session.state.hands, hands_before);
    assert_eq!(table.session.state.turn, turn_before);

    // The rejoined player's snapshot shows their own hand again.
    let snapshot = table.session.snapshot_for(Some(gone));
    let you = snapshot.you.expect("seated viewer");
    assert_eq!(you.hand, table.session.state.hands[1]);
}

#[test]
fn snapshots_redact_everyone_elses_hand() {
    let mut table = Table::join(4);
    table.start();

    let viewer = table.ids[2];
    let snapshot = table.session.snapshot_for(Some(viewer));

    let you = snapshot.you.expect("seated viewer");
    assert_eq!(you.seat, 2);
    assert_eq!(you.hand, table.session.state.hands[2]);

    // The phase payload exposes counts only.
    let PhaseSnapshot::Bidding(bidding) = &snapshot.phase else {
        panic!("expected bidding snapshot");
    };
    let hand_size = table.session.state.hand_size.unwrap();
    assert_eq!(bidding.round.hand_counts, vec![hand_size; 4]);

    // A viewer without a seat gets no hand at all.
    let spectator = table.session.snapshot_for(None);
    assert!(spectator.you.is_none());
}

#[test]
fn snapshot_json_leaks_no_foreign_cards() {
    let mut table = Table::join(4);
    table.start();

    let json = serde_json::to_string(&table.session.snapshot_for(Some(table.ids[0]))).unwrap();
    for seat in 1..4 {
        for card in &table.session.state.hands[seat] {
            let token = serde_json::to_string(card).unwrap();
            assert!(
                !json.contains(&token),
                "seat 0's snapshot contains seat {seat}'s {token}"
            );
        }
    }
}

#[test]
fn snapshot_version_tracks_the_session() {
    let mut table = Table::join(3);
    table.start();
    let snapshot = table.session.snapshot_for(Some(table.ids[0]));
    assert_eq!(snapshot.version, table.session.version);

    table.act_current();
    let snapshot = table.session.snapshot_for(Some(table.ids[0]));
    assert_eq!(snapshot.version, table.session.version);
}

#[test]
fn invariant_violations_poison_the_game() {
    let mut table = Table::join(4);
    table.start();
    for _ in 0..4 {
        table.act_current();
    }

    // Conjure a duplicate card into the on-turn hand: card conservation
    // must catch it on the next play and kill the game, not limp on.
    let seat = require_turn(&table.session.state, "test").unwrap();
    let dup = table.session.state.hands[(seat as usize + 1) % 4][0];
    table.session.state.hands[seat as usize].push(dup);

    let player = table.ids[seat as usize];
    let card = legal_moves(&table.session.state, seat)[0];
    let seq = table.next_seq(seat as usize);
    let err = table
        .flow
        .play_card(&mut table.session, player, seq, card)
        .unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(table.session.state.phase, Phase::Abandoned);

    // Every later command is rejected.
    let err = table
        .flow
        .place_bid(&mut table.session, player, seq + 1, 0)
        .unwrap_err();
    assert_eq!(err, DomainError::GameAbandoned);
    let err = table
        .flow
        .join_game(&mut table.session, table.ids[0], "again".into())
        .unwrap_err();
    assert_eq!(err, DomainError::GameAbandoned);
}
