use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::DomainError;
use crate::services::auto_act;
use crate::services::events::GameEvent;
use crate::services::game_flow::CommandOutcome;
use crate::services::games::{GameId, GameRoom, GameSession, PlayerId};
use crate::state::app_state::AppState;
use crate::ws::hub::EventBatch;
use crate::ws::protocol::{ClientMsg, ErrorCode, ServerMsg, PROTOCOL_VERSION};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(app_state.get_ref().clone());
    ws::start(session, &req, stream)
}

/// The game and player this connection is attached to after a join.
struct Identity {
    game_id: GameId,
    player_id: PlayerId,
    room: Arc<GameRoom>,
}

pub struct WsSession {
    conn_id: Uuid,
    app: AppState,
    identity: Option<Identity>,

    last_heartbeat: Instant,
    hello_done: bool,
}

impl WsSession {
    fn new(app: AppState) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            app,
            identity: None,
            last_heartbeat: Instant::now(),
            hello_done: false,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error_and_close(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        let msg = ServerMsg::Error {
            code,
            message: message.into(),
        };
        Self::send_json(ctx, &msg);
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %actor.conn_id, "[WS SESSION] heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    fn handle_join(
        &mut self,
        ctx: &mut ws::WebsocketContext<Self>,
        game_id: GameId,
        player_id: PlayerId,
        display_name: String,
    ) {
        if self.identity.is_some() {
            Self::send_json(
                ctx,
                &ServerMsg::Error {
                    code: ErrorCode::BadRequest,
                    message: "Connection already joined a game".to_string(),
                },
            );
            return;
        }

        let room = self.app.games.get_or_create(game_id);

        // Apply under the game lock, send after it is released.
        let result = {
            let mut session = room.lock();
            self.app
                .flow
                .join_game(&mut session, player_id, display_name)
                .map(|outcome| {
                    (
                        outcome,
                        session.seat_of(player_id),
                        session.snapshot_for(Some(player_id)),
                    )
                })
        };

        match result {
            Ok((outcome, seat, snapshot)) => {
                self.identity = Some(Identity {
                    game_id,
                    player_id,
                    room: room.clone(),
                });
                self.app
                    .hub
                    .register(game_id, self.conn_id, ctx.address().recipient());

                // Ordering guarantee: joined ack, then the private snapshot.
                Self::send_json(
                    ctx,
                    &ServerMsg::Joined {
                        game_id,
                        player_id,
                        seat,
                        version: outcome.version,
                        rejoined: outcome.rejoined,
                    },
                );
                Self::send_json(ctx, &ServerMsg::Snapshot { snapshot });

                self.app.hub.broadcast(game_id, &outcome.events);
            }
            Err(err) => {
                info!(%game_id, %player_id, error = %err, "[WS SESSION] join rejected");
                Self::send_json(
                    ctx,
                    &ServerMsg::CommandRejected {
                        seq: None,
                        code: err.code().to_string(),
                        message: err.to_string(),
                    },
                );
            }
        }
    }

    /// Shared path for every sequenced command: apply under the lock,
    /// acknowledge the sender, broadcast, re-arm the auto-act timer.
    fn apply_sequenced<F>(&mut self, ctx: &mut ws::WebsocketContext<Self>, seq: u64, f: F)
    where
        F: FnOnce(&AppState, &mut GameSession) -> Result<CommandOutcome, DomainError>,
    {
        let Some(identity) = &self.identity else {
            Self::send_json(
                ctx,
                &ServerMsg::Error {
                    code: ErrorCode::NotJoined,
                    message: "Join a game first".to_string(),
                },
            );
            return;
        };
        let room = identity.room.clone();
        let game_id = identity.game_id;
        let player_id = identity.player_id;

        let (result, version_after) = {
            let mut session = room.lock();
            let result = f(&self.app, &mut session);
            (result, session.version)
        };

        match result {
            Ok(outcome) => {
                Self::send_json(
                    ctx,
                    &ServerMsg::CommandAccepted {
                        seq,
                        version: outcome.version,
                        duplicate: outcome.duplicate,
                    },
                );
                if outcome.duplicate {
                    // The first reply may have been lost; re-sync the sender.
                    let snapshot = room.lock().snapshot_for(Some(player_id));
                    Self::send_json(ctx, &ServerMsg::Snapshot { snapshot });
                } else {
                    self.app.hub.broadcast(game_id, &outcome.events);
                }
                auto_act::maybe_schedule(self.app.flow.clone(), room, self.app.hub.clone());
            }
            Err(err) => {
                // Validation failures go to the offending session only.
                Self::send_json(
                    ctx,
                    &ServerMsg::CommandRejected {
                        seq: Some(seq),
                        code: err.code().to_string(),
                        message: err.to_string(),
                    },
                );
                if err.is_fatal() {
                    // The game was just poisoned; let every client see it.
                    self.app.hub.broadcast(
                        game_id,
                        &[GameEvent::StateChanged {
                            version: version_after,
                        }],
                    );
                }
            }
        }
    }

    /// Detach from the current game, marking the player disconnected.
    fn detach(&mut self, reason: &'static str) {
        let Some(identity) = self.identity.take() else {
            return;
        };
        self.app.hub.unregister(identity.game_id, self.conn_id);

        let result = {
            let mut session = identity.room.lock();
            self.app.flow.leave_game(&mut session, identity.player_id)
        };
        match result {
            Ok(outcome) => {
                info!(
                    game_id = %identity.game_id,
                    player_id = %identity.player_id,
                    reason,
                    "[WS SESSION] detached"
                );
                self.app.hub.broadcast(identity.game_id, &outcome.events);
                auto_act::maybe_schedule(
                    self.app.flow.clone(),
                    identity.room.clone(),
                    self.app.hub.clone(),
                );
            }
            Err(err) => {
                // Seat already released (lobby leave) or game abandoned.
                info!(
                    game_id = %identity.game_id,
                    player_id = %identity.player_id,
                    error = %err,
                    "[WS SESSION] detach was a no-op"
                );
            }
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, "[WS SESSION] started");
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.detach("socket closed");
        info!(conn_id = %self.conn_id, "[WS SESSION] stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                let parsed: Result<ClientMsg, _> = serde_json::from_str(&text);
                let Ok(cmd) = parsed else {
                    self.send_error_and_close(ctx, ErrorCode::BadRequest, "Malformed JSON");
                    return;
                };

                if !self.hello_done && !matches!(cmd, ClientMsg::Hello { .. }) {
                    self.send_error_and_close(ctx, ErrorCode::BadRequest, "Must send hello first");
                    return;
                }

                match cmd {
                    ClientMsg::Hello { protocol } => {
                        if protocol != PROTOCOL_VERSION {
                            self.send_error_and_close(
                                ctx,
                                ErrorCode::BadProtocol,
                                "Unsupported protocol version",
                            );
                            return;
                        }
                        self.hello_done = true;
                        Self::send_json(
                            ctx,
                            &ServerMsg::HelloAck {
                                protocol: PROTOCOL_VERSION,
                            },
                        );
                    }

                    ClientMsg::JoinGame {
                        game_id,
                        player_id,
                        display_name,
                    } => self.handle_join(ctx, game_id, player_id, display_name),

                    ClientMsg::StartGame { seq } => {
                        let player_id = self.identity.as_ref().map(|i| i.player_id);
                        self.apply_sequenced(ctx, seq, |app, session| {
                            let player_id = player_id.ok_or(DomainError::UnknownPlayer)?;
                            app.flow.start_game(session, player_id, seq)
                        });
                    }

                    ClientMsg::PlaceBid { seq, bid } => {
                        let player_id = self.identity.as_ref().map(|i| i.player_id);
                        self.apply_sequenced(ctx, seq, |app, session| {
                            let player_id = player_id.ok_or(DomainError::UnknownPlayer)?;
                            app.flow.place_bid(session, player_id, seq, bid)
                        });
                    }

                    ClientMsg::PlayCard { seq, card } => {
                        let player_id = self.identity.as_ref().map(|i| i.player_id);
                        self.apply_sequenced(ctx, seq, |app, session| {
                            let player_id = player_id.ok_or(DomainError::UnknownPlayer)?;
                            app.flow.play_card(session, player_id, seq, card)
                        });
                    }

                    ClientMsg::LeaveGame { seq } => {
                        let player_id = self.identity.as_ref().map(|i| i.player_id);
                        self.apply_sequenced(ctx, seq, |app, session| {
                            let player_id = player_id.ok_or(DomainError::UnknownPlayer)?;
                            app.flow.leave_game(session, player_id)
                        });
                        // An explicit leave also ends the connection.
                        if let Some(identity) = self.identity.take() {
                            self.app.hub.unregister(identity.game_id, self.conn_id);
                        }
                        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                        ctx.stop();
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, ErrorCode::BadRequest, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(conn_id = %self.conn_id, error = %err, "[WS SESSION] protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<EventBatch> for WsSession {
    type Result = ();

    fn handle(&mut self, batch: EventBatch, ctx: &mut Self::Context) -> Self::Result {
        let Some(identity) = &self.identity else {
            return;
        };

        for event in batch.events.iter() {
            match event {
                // A state change means "fetch your own view": each session
                // builds its redacted snapshot, so hands never cross seats.
                GameEvent::StateChanged { .. } => {
                    let snapshot = identity.room.lock().snapshot_for(Some(identity.player_id));
                    Self::send_json(ctx, &ServerMsg::Snapshot { snapshot });
                }
                other => {
                    Self::send_json(
                        ctx,
                        &ServerMsg::Event {
                            event: other.clone(),
                        },
                    );
                }
            }
        }
    }
}
