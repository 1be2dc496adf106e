use tracing::{debug, info};

use super::{CommandOutcome, GameFlowService};
use crate::domain::state::Seat;
use crate::domain::{bidding, tricks, Card, DomainError, Phase, MAX_PLAYERS, MIN_PLAYERS};
use crate::services::events::GameEvent;
use crate::services::games::{GameSession, PlayerId, PlayerSlot};

/// Result of a join: the events to broadcast plus whether this was a
/// reconnection of an existing seat.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub version: u64,
    pub events: Vec<GameEvent>,
    pub rejoined: bool,
}

impl GameFlowService {
    /// Join a game, or re-attach a disconnected player to their seat.
    ///
    /// Joins carry no sequence number: they are naturally idempotent. A
    /// reconnect mutates nothing but the connection flag; the caller pushes
    /// a fresh snapshot to the joining session only.
    pub fn join_game(
        &self,
        session: &mut GameSession,
        player_id: PlayerId,
        display_name: String,
    ) -> Result<JoinOutcome, DomainError> {
        if session.state.phase == Phase::Abandoned {
            return Err(DomainError::GameAbandoned);
        }

        if let Some(slot) = session.player_mut(player_id) {
            if slot.connected {
                return Err(DomainError::DuplicatePlayer);
            }
            slot.connected = true;
            session.version += 1;
            info!(game_id = %session.game_id, %player_id, "player reconnected");
            return Ok(JoinOutcome {
                version: session.version,
                events: vec![
                    GameEvent::PlayerRejoined { player_id },
                    GameEvent::StateChanged {
                        version: session.version,
                    },
                ],
                rejoined: true,
            });
        }

        if session.state.phase != Phase::Lobby {
            return Err(DomainError::GameStarted);
        }
        if session.roster.len() >= MAX_PLAYERS as usize {
            return Err(DomainError::GameFull);
        }

        session.roster.push(PlayerSlot {
            id: player_id,
            display_name: display_name.clone(),
            connected: true,
        });
        session.host.get_or_insert(player_id);
        session.version += 1;
        info!(game_id = %session.game_id, %player_id, "player joined");

        Ok(JoinOutcome {
            version: session.version,
            events: vec![
                GameEvent::PlayerJoined {
                    player_id,
                    display_name,
                },
                GameEvent::StateChanged {
                    version: session.version,
                },
            ],
            rejoined: false,
        })
    }

    /// Start the game: fixes the turn order and deals the first round.
    pub fn start_game(
        &self,
        session: &mut GameSession,
        requester: PlayerId,
        seq: u64,
    ) -> Result<CommandOutcome, DomainError> {
        self.with_ledger(session, requester, seq, |flow, session| {
            if session.state.phase != Phase::Lobby {
                return Err(DomainError::GameStarted);
            }
            if session.seat_of(requester).is_none() {
                return Err(DomainError::UnknownPlayer);
            }
            if session.host != Some(requester) {
                return Err(DomainError::NotHost);
            }

            let seated = session.roster.len() as u8;
            if seated < MIN_PLAYERS {
                return Err(DomainError::TooFewPlayers { seated });
            }
            if seated > MAX_PLAYERS {
                return Err(DomainError::TooManyPlayers { seated });
            }
            session.config.validate_for_players(seated)?;

            session.state.begin(seated);
            info!(game_id = %session.game_id, players = seated, "game started");

            let mut events = vec![GameEvent::GameStarted {
                player_count: seated,
            }];
            flow.run_transitions(session, &mut events)?;
            Ok(events)
        })
    }

    /// Place a bid for the player's seat.
    pub fn place_bid(
        &self,
        session: &mut GameSession,
        player_id: PlayerId,
        seq: u64,
        bid: u8,
    ) -> Result<CommandOutcome, DomainError> {
        let seat = session.seat_of(player_id).ok_or(DomainError::UnknownPlayer)?;
        self.with_ledger(session, player_id, seq, |_, session| {
            debug!(game_id = %session.game_id, seat, bid, "bid submitted");
            bidding::place_bid(&mut session.state, seat, bid)?;
            Ok(Vec::new())
        })
    }

    /// Play a card for the player's seat, resolving the trick and the
    /// round when this play completes them.
    pub fn play_card(
        &self,
        session: &mut GameSession,
        player_id: PlayerId,
        seq: u64,
        card: Card,
    ) -> Result<CommandOutcome, DomainError> {
        let seat = session.seat_of(player_id).ok_or(DomainError::UnknownPlayer)?;
        self.with_ledger(session, player_id, seq, |flow, session| {
            debug!(game_id = %session.game_id, seat, card = ?card, "card played");
            let mut events = Vec::new();
            flow.apply_play(session, seat, card, &mut events)?;
            Ok(events)
        })
    }

    /// Mark a player as gone. The seat survives mid-game; in the lobby the
    /// seat is released. Leaving twice is a no-op.
    pub fn leave_game(
        &self,
        session: &mut GameSession,
        player_id: PlayerId,
    ) -> Result<CommandOutcome, DomainError> {
        if session.state.phase == Phase::Abandoned {
            return Err(DomainError::GameAbandoned);
        }
        let connected = session
            .player(player_id)
            .ok_or(DomainError::UnknownPlayer)?
            .connected;

        if !connected {
            return Ok(CommandOutcome {
                version: session.version,
                events: Vec::new(),
                duplicate: true,
            });
        }

        if session.state.phase == Phase::Lobby {
            session.roster.retain(|p| p.id != player_id);
            if session.host == Some(player_id) {
                session.host = session.roster.first().map(|p| p.id);
            }
        } else if let Some(slot) = session.player_mut(player_id) {
            // Seat is kept; turn handling is the disconnect policy's job.
            slot.connected = false;
        }

        session.version += 1;
        info!(game_id = %session.game_id, %player_id, "player left");
        Ok(CommandOutcome {
            version: session.version,
            events: vec![
                GameEvent::PlayerLeft { player_id },
                GameEvent::StateChanged {
                    version: session.version,
                },
            ],
            duplicate: false,
        })
    }

    /// Act for the disconnected on-turn player: lowest legal bid or card.
    ///
    /// Returns None when nothing needs doing (reconnected, or the turn
    /// moved on). Driven by the auto-act timer, never by clients, so it
    /// bypasses the idempotency ledger.
    pub fn auto_act(
        &self,
        session: &mut GameSession,
    ) -> Result<Option<CommandOutcome>, DomainError> {
        let Some(seat) = session.disconnected_on_turn() else {
            return Ok(None);
        };

        let result = (|| -> Result<Vec<GameEvent>, DomainError> {
            let mut events = Vec::new();
            match session.state.phase {
                Phase::Bidding => {
                    let bid = self
                        .policy
                        .choose_bid(&session.state, seat)
                        .map_err(|e| DomainError::invariant(format!("auto-bid failed: {e}")))?;
                    info!(game_id = %session.game_id, seat, bid, "auto-bidding for absent player");
                    bidding::place_bid(&mut session.state, seat, bid)?;
                }
                Phase::Playing { .. } => {
                    let card = self
                        .policy
                        .choose_play(&session.state, seat)
                        .map_err(|e| DomainError::invariant(format!("auto-play failed: {e}")))?;
                    info!(game_id = %session.game_id, seat, card = ?card, "auto-playing for absent player");
                    self.apply_play(session, seat, card, &mut events)?;
                }
                // disconnected_on_turn only fires in the two phases above.
                _ => {}
            }
            Ok(events)
        })();

        match result {
            Ok(mut events) => {
                session.version += 1;
                events.push(GameEvent::StateChanged {
                    version: session.version,
                });
                Ok(Some(CommandOutcome {
                    version: session.version,
                    events,
                    duplicate: false,
                }))
            }
            Err(err) if err.is_fatal() => Err(self.abandon(session, err)),
            Err(err) => Err(err),
        }
    }

    /// Shared play path: domain play plus trick/round follow-up events.
    fn apply_play(
        &self,
        session: &mut GameSession,
        seat: Seat,
        card: Card,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), DomainError> {
        let result = tricks::play_card(&mut session.state, seat, card)?;
        if let Some(winner) = result.trick_winner {
            events.push(GameEvent::TrickResolved {
                winner,
                trick_no: result.trick_no,
            });
        }
        if result.round_complete {
            self.run_transitions(session, events)?;
        }
        Ok(())
    }
}
