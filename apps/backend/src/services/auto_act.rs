//! Deadline-driven default actions for disconnected players.
//!
//! With `DisconnectPolicy::AutoAct`, a disconnected player on turn gets a
//! grace period to reconnect; after it expires the engine bids or plays for
//! them. With `Block` (the default) nothing is scheduled and the round
//! waits.

use std::sync::Arc;

use tracing::warn;

use crate::config::DisconnectPolicy;
use crate::services::events::GameEvent;
use crate::services::game_flow::GameFlowService;
use crate::services::games::GameRoom;
use crate::ws::hub::GameSessionRegistry;

/// Arm the auto-act timer if the on-turn player is currently disconnected.
///
/// Call after every applied command and disconnect. The timer re-checks the
/// state version when it fires, so any intervening command or reconnect
/// invalidates it; a stale timer simply does nothing.
pub fn maybe_schedule(
    flow: Arc<GameFlowService>,
    room: Arc<GameRoom>,
    hub: Arc<GameSessionRegistry>,
) {
    let (game_id, grace, armed_version) = {
        let session = room.lock();
        let DisconnectPolicy::AutoAct { grace } = session.config.disconnect_policy else {
            return;
        };
        if session.disconnected_on_turn().is_none() {
            return;
        }
        (session.game_id, grace, session.version)
    };

    tokio::spawn(async move {
        tokio::time::sleep(grace).await;

        let outcome = {
            let mut session = room.lock();
            if session.version != armed_version {
                // Someone acted or reconnected in the meantime.
                return;
            }
            match flow.auto_act(&mut session) {
                Ok(Some(outcome)) => outcome,
                Ok(None) => return,
                Err(err) => {
                    warn!(%game_id, error = %err, "auto-act failed");
                    let version = session.version;
                    drop(session);
                    // Fatal failures abandoned the game; let clients see it.
                    hub.broadcast(game_id, &[GameEvent::StateChanged { version }]);
                    return;
                }
            }
        };
        hub.broadcast(game_id, &outcome.events);

        // The next on-turn player may be absent too.
        maybe_schedule(flow, room, hub);
    });
}
