//! Game flow orchestration - applies player commands against the owned
//! game state and advances phases until the game waits on a player again.
//!
//! Commands are idempotent per player: each carries a monotonically
//! increasing sequence number, and a replayed number is answered with the
//! version the original application produced, without touching state.

mod player_actions;
mod round_lifecycle;

pub use player_actions::JoinOutcome;

use tracing::error;

use crate::ai::{LowestLegal, Policy};
use crate::domain::{DomainError, Phase};
use crate::services::events::GameEvent;
use crate::services::games::{GameSession, PlayerId};

/// Result of one applied (or deduplicated) command.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    /// State version after this command.
    pub version: u64,
    /// Public events to broadcast; empty for duplicates.
    pub events: Vec<GameEvent>,
    /// True when the command was recognized as a replay and ignored.
    pub duplicate: bool,
}

/// Applies commands; stateless apart from the auto-action policy.
pub struct GameFlowService {
    policy: Box<dyn Policy>,
}

impl Default for GameFlowService {
    fn default() -> Self {
        Self {
            policy: Box::new(LowestLegal),
        }
    }
}

impl GameFlowService {
    pub fn with_policy(policy: Box<dyn Policy>) -> Self {
        Self { policy }
    }

    /// Idempotency wrapper shared by every sequenced command.
    ///
    /// On success, bumps the version, appends the closing StateChanged
    /// event, and records the sequence number. Fatal domain errors poison
    /// the game before being returned.
    fn with_ledger<F>(
        &self,
        session: &mut GameSession,
        player_id: PlayerId,
        seq: u64,
        f: F,
    ) -> Result<CommandOutcome, DomainError>
    where
        F: FnOnce(&Self, &mut GameSession) -> Result<Vec<GameEvent>, DomainError>,
    {
        if session.state.phase == Phase::Abandoned {
            return Err(DomainError::GameAbandoned);
        }
        if let Some(ledger) = session.ledger(player_id) {
            if seq <= ledger.last_seq {
                return Ok(CommandOutcome {
                    version: ledger.version_after,
                    events: Vec::new(),
                    duplicate: true,
                });
            }
        }

        match f(self, session) {
            Ok(mut events) => {
                session.version += 1;
                events.push(GameEvent::StateChanged {
                    version: session.version,
                });
                session.record_command(player_id, seq);
                Ok(CommandOutcome {
                    version: session.version,
                    events,
                    duplicate: false,
                })
            }
            Err(err) if err.is_fatal() => Err(self.abandon(session, err)),
            Err(err) => Err(err),
        }
    }

    /// Poison the game after an invariant violation. Continuing would risk
    /// dealing duplicate cards or miscounting tricks, so the full state is
    /// dumped to the log and every later command is rejected.
    fn abandon(&self, session: &mut GameSession, err: DomainError) -> DomainError {
        error!(
            game_id = %session.game_id,
            error = %err,
            state = ?session.state,
            "invariant violation; marking game unrecoverable"
        );
        session.state.phase = Phase::Abandoned;
        session.state.turn = None;
        session.state.leader = None;
        session.version += 1;
        err
    }
}
