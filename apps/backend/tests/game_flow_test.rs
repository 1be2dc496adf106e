//! End-to-end service tests: lobby, whole games, and command rejection.

mod common;

use backend::domain::{DomainError, Phase};
use backend::services::events::GameEvent;
use common::Table;
use uuid::Uuid;

#[test]
fn lobby_rejects_an_eighth_player() {
    let mut table = Table::join(7);
    let late = Uuid::new_v4();
    let err = table
        .flow
        .join_game(&mut table.session, late, "late".into())
        .unwrap_err();
    assert_eq!(err, DomainError::GameFull);
    assert_eq!(table.session.roster.len(), 7);
}

#[test]
fn lobby_rejects_a_connected_duplicate_id() {
    let mut table = Table::join(3);
    let dup = table.ids[1];
    let err = table
        .flow
        .join_game(&mut table.session, dup, "imposter".into())
        .unwrap_err();
    assert_eq!(err, DomainError::DuplicatePlayer);
}

#[test]
fn new_players_cannot_join_a_started_game() {
    let mut table = Table::join(3);
    table.start();
    let err = table
        .flow
        .join_game(&mut table.session, Uuid::new_v4(), "late".into())
        .unwrap_err();
    assert_eq!(err, DomainError::GameStarted);
}

#[test]
fn only_the_host_may_start() {
    let mut table = Table::join(4);
    let not_host = table.ids[2];
    let err = table
        .flow
        .start_game(&mut table.session, not_host, 1)
        .unwrap_err();
    assert_eq!(err, DomainError::NotHost);
    assert_eq!(table.session.state.phase, Phase::Lobby);
}

#[test]
fn starting_needs_at_least_three_players() {
    let mut table = Table::join(2);
    let host = table.ids[0];
    let err = table
        .flow
        .start_game(&mut table.session, host, 1)
        .unwrap_err();
    assert_eq!(err, DomainError::TooFewPlayers { seated: 2 });
}

#[test]
fn starting_twice_is_rejected() {
    let mut table = Table::join(3);
    table.start();
    let host = table.ids[0];
    let err = table
        .flow
        .start_game(&mut table.session, host, 99)
        .unwrap_err();
    assert_eq!(err, DomainError::GameStarted);
}

#[test]
fn start_deals_the_first_round_and_opens_bidding() {
    let mut table = Table::join(4);
    let outcome = table.start();

    assert_eq!(table.session.state.phase, Phase::Bidding);
    assert_eq!(table.session.state.round_no, Some(1));
    let hand_size = table.session.config.schedule[0] as usize;
    assert!(table
        .session
        .state
        .hands
        .iter()
        .all(|h| h.len() == hand_size));
    // Dealer seat 0 for round 1, so seat 1 bids first.
    assert_eq!(table.session.state.dealer, Some(0));
    assert_eq!(table.session.state.turn, Some(1));
    assert!(outcome
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::GameStarted { player_count: 4 })));
}

#[test]
fn a_full_game_runs_to_the_end() {
    for players in [3usize, 5, 7] {
        let mut table = Table::join(players);
        table.start();
        let events = table.drive_to_game_end();

        let rounds = table.session.config.total_rounds();
        let scored = events
            .iter()
            .filter(|e| matches!(e, GameEvent::RoundScored { .. }))
            .count();
        assert_eq!(scored as u8, rounds, "{players} players: every round scored");

        let ended: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::GameEnded {
                    winner,
                    final_scores,
                } => Some((winner, final_scores)),
                _ => None,
            })
            .collect();
        assert_eq!(ended.len(), 1);
        let (winner, final_scores) = ended[0];
        assert_eq!(final_scores, &table.session.state.scores_total);
        let best = *final_scores.iter().max().unwrap();
        assert_eq!(final_scores[*winner as usize], best);
        assert_eq!(table.session.state.winner, Some(*winner));
    }
}

#[test]
fn round_deltas_sum_into_final_scores() {
    let mut table = Table::join(4);
    table.start();
    let events = table.drive_to_game_end();

    let mut accumulated = vec![0i32; 4];
    for event in &events {
        if let GameEvent::RoundScored { deltas, .. } = event {
            for (seat, delta) in deltas.iter().enumerate() {
                accumulated[seat] += delta;
            }
        }
    }
    assert_eq!(accumulated, table.session.state.scores_total);
}

#[test]
fn trick_events_name_a_winner_per_trick() {
    let mut table = Table::join(4);
    table.start();
    let events = table.drive_to_game_end();

    let tricks_per_game: usize = table
        .session
        .config
        .schedule
        .iter()
        .map(|&hs| hs as usize)
        .sum();
    let resolved = events
        .iter()
        .filter(|e| matches!(e, GameEvent::TrickResolved { .. }))
        .count();
    assert_eq!(resolved, tricks_per_game);
}

#[test]
fn versions_increase_monotonically() {
    let mut table = Table::join(3);
    let mut last = table.session.version;
    table.start();
    assert!(table.session.version > last);
    last = table.session.version;

    for _ in 0..10 {
        let outcome = table.act_current();
        assert!(outcome.version > last);
        assert_eq!(outcome.version, table.session.version);
        last = outcome.version;
    }
}

#[test]
fn rejected_commands_change_nothing() {
    let mut table = Table::join(4);
    table.start();
    let version_before = table.session.version;
    let hands_before = table.session.state.hands.clone();

    // Seat 2 is not on turn (seat 1 bids first).
    let off_turn = table.ids[2];
    let err = table
        .flow
        .place_bid(&mut table.session, off_turn, 1, 0)
        .unwrap_err();
    assert_eq!(err, DomainError::OutOfTurn);

    // A play during bidding is a phase error.
    let on_turn = table.ids[1];
    let card = table.session.state.hands[1][0];
    let err = table
        .flow
        .play_card(&mut table.session, on_turn, 1, card)
        .unwrap_err();
    assert_eq!(err, DomainError::WrongPhase);

    assert_eq!(table.session.version, version_before);
    assert_eq!(table.session.state.hands, hands_before);
}

#[test]
fn unknown_players_are_rejected() {
    let mut table = Table::join(3);
    table.start();
    let stranger = Uuid::new_v4();
    let err = table
        .flow
        .place_bid(&mut table.session, stranger, 1, 0)
        .unwrap_err();
    assert_eq!(err, DomainError::UnknownPlayer);
}
