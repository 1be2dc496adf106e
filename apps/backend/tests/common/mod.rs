//! Shared harness for service-level tests: a table of players driven
//! through the command path the way the websocket layer drives it.
#![allow(dead_code)]

use backend::config::GameConfig;
use backend::domain::bidding::legal_bids;
use backend::domain::state::require_turn;
use backend::domain::tricks::legal_moves;
use backend::domain::Phase;
use backend::services::events::GameEvent;
use backend::services::game_flow::{CommandOutcome, GameFlowService};
use backend::services::games::{GameSession, PlayerId};
use uuid::Uuid;

pub struct Table {
    pub flow: GameFlowService,
    pub session: GameSession,
    pub ids: Vec<PlayerId>,
    seqs: Vec<u64>,
}

impl Table {
    /// A lobby with `players` joined and nothing started. Deterministic:
    /// the dealing seed is fixed.
    pub fn join(players: usize) -> Self {
        backend_test_support::logging::init();

        let flow = GameFlowService::default();
        let mut session = GameSession::new(Uuid::new_v4(), GameConfig::default(), 0xC0FFEE);
        let ids: Vec<PlayerId> = (0..players).map(|_| Uuid::new_v4()).collect();
        for (i, id) in ids.iter().enumerate() {
            flow.join_game(&mut session, *id, format!("player-{i}"))
                .expect("join must succeed");
        }
        Self {
            flow,
            session,
            ids,
            seqs: vec![0; players],
        }
    }

    pub fn next_seq(&mut self, seat: usize) -> u64 {
        self.seqs[seat] += 1;
        self.seqs[seat]
    }

    pub fn start(&mut self) -> CommandOutcome {
        let host = self.ids[0];
        let seq = self.next_seq(0);
        self.flow
            .start_game(&mut self.session, host, seq)
            .expect("start must succeed")
    }

    /// Whoever is on turn performs their lowest legal action.
    pub fn act_current(&mut self) -> CommandOutcome {
        let seat = require_turn(&self.session.state, "test act").unwrap() as usize;
        let player = self.ids[seat];
        let seq = self.next_seq(seat);
        match self.session.state.phase {
            Phase::Bidding => {
                let bid = legal_bids(&self.session.state, seat as u8)[0];
                self.flow
                    .place_bid(&mut self.session, player, seq, bid)
                    .expect("legal bid must apply")
            }
            Phase::Playing { .. } => {
                let card = legal_moves(&self.session.state, seat as u8)[0];
                self.flow
                    .play_card(&mut self.session, player, seq, card)
                    .expect("legal play must apply")
            }
            other => panic!("nobody can act in {other:?}"),
        }
    }

    /// Drive the started game to its end, collecting every event.
    pub fn drive_to_game_end(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let mut guard = 0;
        while self.session.state.phase != Phase::GameEnd {
            let outcome = self.act_current();
            events.extend(outcome.events);
            guard += 1;
            assert!(guard < 10_000, "game did not converge");
        }
        events
    }
}
