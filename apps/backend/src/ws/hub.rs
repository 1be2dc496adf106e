use std::sync::Arc;

use actix::prelude::*;
use dashmap::DashMap;
use uuid::Uuid;

use crate::services::events::GameEvent;
use crate::services::games::GameId;

/// Batch of public events delivered to every session of a game.
///
/// Sessions forward the events and answer each `StateChanged` by building
/// their own redacted snapshot; the batch itself never carries private
/// state.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct EventBatch {
    pub events: Arc<Vec<GameEvent>>,
}

/// Registry of live websocket sessions per game.
///
/// Delivery is fire-and-forget relative to state mutation: broadcasts are
/// mailbox sends after the game lock is released, and a failed delivery
/// never rolls anything back - the client re-syncs via snapshot versions.
#[derive(Default)]
pub struct GameSessionRegistry {
    sessions: DashMap<GameId, DashMap<Uuid, Recipient<EventBatch>>>,
}

impl GameSessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn register(&self, game_id: GameId, conn_id: Uuid, recipient: Recipient<EventBatch>) {
        let entry = self.sessions.entry(game_id).or_default();
        entry.insert(conn_id, recipient);
    }

    pub fn unregister(&self, game_id: GameId, conn_id: Uuid) {
        if let Some(entry) = self.sessions.get(&game_id) {
            entry.remove(&conn_id);
            if entry.is_empty() {
                drop(entry);
                self.sessions.remove_if(&game_id, |_, conns| conns.is_empty());
            }
        }
    }

    pub fn broadcast(&self, game_id: GameId, events: &[GameEvent]) {
        if events.is_empty() {
            return;
        }
        if let Some(entry) = self.sessions.get(&game_id) {
            let batch = EventBatch {
                events: Arc::new(events.to_vec()),
            };
            for recipient in entry.iter() {
                let _ = recipient.value().do_send(batch.clone());
            }
        }
    }

    /// Number of live sessions attached to a game.
    pub fn session_count(&self, game_id: GameId) -> usize {
        self.sessions.get(&game_id).map_or(0, |entry| entry.len())
    }
}
