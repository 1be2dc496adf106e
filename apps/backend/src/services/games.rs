//! In-memory game registry and per-game sessions.
//!
//! The registry owns one [`GameRoom`] per game id. A room's mutex is the
//! serialization point demanded by the concurrency model: no two commands
//! are ever applied concurrently against the same game, while snapshot
//! reads for different games proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use rand::Rng;
use uuid::Uuid;

use crate::config::GameConfig;
use crate::domain::snapshot::{snapshot_for, GameHeader, GameSnapshot, SeatPublic};
use crate::domain::state::Seat;
use crate::domain::{GameState, Phase};

pub type GameId = Uuid;
pub type PlayerId = Uuid;

/// A player's stable identity and connection state. Roster order is seat
/// order once the game starts.
#[derive(Debug, Clone)]
pub struct PlayerSlot {
    pub id: PlayerId,
    pub display_name: String,
    pub connected: bool,
}

/// Idempotency record: the last applied command sequence number for a
/// player and the state version it produced.
#[derive(Debug, Clone, Copy)]
pub struct CommandLedger {
    pub last_seq: u64,
    pub version_after: u64,
}

/// Everything the engine knows about one game. Owned by a [`GameRoom`];
/// only ever touched under its mutex.
#[derive(Debug)]
pub struct GameSession {
    pub game_id: GameId,
    pub config: GameConfig,
    /// Base seed; each round derives its own dealing seed from it.
    pub seed: u64,
    /// First joiner; the only player allowed to start the game.
    pub host: Option<PlayerId>,
    pub roster: Vec<PlayerSlot>,
    pub state: GameState,
    /// Bumped on every applied mutation and carried on every broadcast.
    pub version: u64,
    command_log: HashMap<PlayerId, CommandLedger>,
}

impl GameSession {
    pub fn new(game_id: GameId, config: GameConfig, seed: u64) -> Self {
        Self {
            game_id,
            config,
            seed,
            host: None,
            roster: Vec::new(),
            state: GameState::lobby(),
            version: 0,
            command_log: HashMap::new(),
        }
    }

    pub fn seat_of(&self, player_id: PlayerId) -> Option<Seat> {
        self.roster
            .iter()
            .position(|p| p.id == player_id)
            .map(|i| i as Seat)
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&PlayerSlot> {
        self.roster.iter().find(|p| p.id == player_id)
    }

    pub fn player_mut(&mut self, player_id: PlayerId) -> Option<&mut PlayerSlot> {
        self.roster.iter_mut().find(|p| p.id == player_id)
    }

    pub fn ledger(&self, player_id: PlayerId) -> Option<CommandLedger> {
        self.command_log.get(&player_id).copied()
    }

    pub fn record_command(&mut self, player_id: PlayerId, seq: u64) {
        self.command_log.insert(
            player_id,
            CommandLedger {
                last_seq: seq,
                version_after: self.version,
            },
        );
    }

    /// The seat the engine may need to act for: the on-turn player, when
    /// disconnected mid-game.
    pub fn disconnected_on_turn(&self) -> Option<Seat> {
        if !matches!(self.state.phase, Phase::Bidding | Phase::Playing { .. }) {
            return None;
        }
        let seat = self.state.turn?;
        let slot = self.roster.get(seat as usize)?;
        (!slot.connected).then_some(seat)
    }

    /// Build the redacted snapshot one player is allowed to see.
    ///
    /// An id without a seat (or `None`) gets the fully redacted view: no
    /// hand at all, counts only.
    pub fn snapshot_for(&self, viewer: Option<PlayerId>) -> GameSnapshot {
        let seating = self
            .roster
            .iter()
            .enumerate()
            .map(|(seat, p)| SeatPublic {
                seat: seat as Seat,
                player_id: p.id,
                display_name: p.display_name.clone(),
                connected: p.connected,
            })
            .collect();

        let header = GameHeader {
            game_id: self.game_id,
            host: self.host,
            round_no: self.state.round_no,
            hand_size: self.state.hand_size,
            dealer: self.state.dealer,
            seating,
            scores_total: self.state.scores_total.clone(),
        };

        let viewer_seat = viewer.and_then(|id| self.seat_of(id));
        snapshot_for(&self.state, header, viewer_seat, self.version)
    }
}

/// One game's serialization point.
#[derive(Debug)]
pub struct GameRoom {
    inner: Mutex<GameSession>,
}

impl GameRoom {
    fn new(session: GameSession) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }

    /// Enter the game's critical section. Hold it for command application
    /// only; never across network I/O.
    pub fn lock(&self) -> MutexGuard<'_, GameSession> {
        self.inner.lock()
    }
}

/// All live games in this process.
#[derive(Default)]
pub struct GameRegistry {
    games: DashMap<GameId, Arc<GameRoom>>,
    config: GameConfig,
}

impl GameRegistry {
    pub fn new(config: GameConfig) -> Self {
        Self {
            games: DashMap::new(),
            config,
        }
    }

    /// Look up a game, creating it on first join.
    pub fn get_or_create(&self, game_id: GameId) -> Arc<GameRoom> {
        self.games
            .entry(game_id)
            .or_insert_with(|| {
                let seed = rand::rng().random::<u64>();
                Arc::new(GameRoom::new(GameSession::new(
                    game_id,
                    self.config.clone(),
                    seed,
                )))
            })
            .clone()
    }

    pub fn get(&self, game_id: GameId) -> Option<Arc<GameRoom>> {
        self.games.get(&game_id).map(|entry| entry.clone())
    }

    /// Drop a finished or fully abandoned game.
    pub fn remove(&self, game_id: GameId) {
        self.games.remove(&game_id);
    }
}
