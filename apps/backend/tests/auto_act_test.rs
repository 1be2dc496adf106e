//! Disconnect auto-act: after the grace period the engine bids and plays
//! for absent players, through the same serialized command path.

use std::sync::Arc;
use std::time::Duration;

use backend::config::{DisconnectPolicy, GameConfig};
use backend::domain::Phase;
use backend::services::auto_act;
use backend::state::app_state::AppState;
use uuid::Uuid;

fn auto_act_config(schedule: Vec<u8>, grace: Duration) -> GameConfig {
    GameConfig {
        schedule,
        disconnect_policy: DisconnectPolicy::AutoAct { grace },
        ..GameConfig::default()
    }
}

async fn wait_for<F>(mut check: F)
where
    F: FnMut() -> bool,
{
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("condition not reached within 5s");
}

#[tokio::test]
async fn absent_on_turn_player_is_auto_bid_after_grace() {
    backend_test_support::logging::init();
    let app = AppState::new(auto_act_config(vec![3, 2], Duration::from_millis(5)));

    let game_id = Uuid::new_v4();
    let room = app.games.get_or_create(game_id);
    let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

    {
        let mut session = room.lock();
        for (i, id) in ids.iter().enumerate() {
            app.flow
                .join_game(&mut session, *id, format!("p{i}"))
                .unwrap();
        }
        app.flow.start_game(&mut session, ids[0], 1).unwrap();
        assert_eq!(session.state.turn, Some(1));
        // The first bidder walks away.
        app.flow.leave_game(&mut session, ids[1]).unwrap();
    }

    auto_act::maybe_schedule(app.flow.clone(), Arc::clone(&room), app.hub.clone());

    wait_for(|| room.lock().state.round.bids[1].is_some()).await;
    let session = room.lock();
    // Lowest legal bid for an unconstrained bidder is zero.
    assert_eq!(session.state.round.bids[1], Some(0));
    assert_eq!(session.state.turn, Some(2));
}

#[tokio::test]
async fn a_fully_abandoned_table_plays_itself_out() {
    backend_test_support::logging::init();
    let app = AppState::new(auto_act_config(vec![2, 1], Duration::from_millis(5)));

    let game_id = Uuid::new_v4();
    let room = app.games.get_or_create(game_id);
    let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

    {
        let mut session = room.lock();
        for (i, id) in ids.iter().enumerate() {
            app.flow
                .join_game(&mut session, *id, format!("p{i}"))
                .unwrap();
        }
        app.flow.start_game(&mut session, ids[0], 1).unwrap();
        for id in &ids {
            app.flow.leave_game(&mut session, *id).unwrap();
        }
    }

    auto_act::maybe_schedule(app.flow.clone(), Arc::clone(&room), app.hub.clone());

    wait_for(|| room.lock().state.phase == Phase::GameEnd).await;
    let session = room.lock();
    assert!(session.state.winner.is_some());
    // Two rounds were scored for three seats.
    let prev = session.state.round.previous_round.as_ref().unwrap();
    assert_eq!(prev.round_no, 2);
}

#[tokio::test]
async fn reconnection_disarms_the_pending_timer() {
    backend_test_support::logging::init();
    let app = AppState::new(auto_act_config(vec![3], Duration::from_millis(500)));

    let game_id = Uuid::new_v4();
    let room = app.games.get_or_create(game_id);
    let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

    {
        let mut session = room.lock();
        for (i, id) in ids.iter().enumerate() {
            app.flow
                .join_game(&mut session, *id, format!("p{i}"))
                .unwrap();
        }
        app.flow.start_game(&mut session, ids[0], 1).unwrap();
        app.flow.leave_game(&mut session, ids[1]).unwrap();
    }

    auto_act::maybe_schedule(app.flow.clone(), Arc::clone(&room), app.hub.clone());

    // Reconnect immediately: the version moves on and the armed timer must
    // not fire an action for the returned player.
    {
        let mut session = room.lock();
        app.flow
            .join_game(&mut session, ids[1], "p1".into())
            .unwrap();
    }

    tokio::time::sleep(Duration::from_millis(700)).await;
    let session = room.lock();
    assert_eq!(session.state.round.bids[1], None, "player kept their turn");
    assert_eq!(session.state.turn, Some(1));
}
