/// WebSocket session handler for one game client.
///
/// This actor manages a single client's connection: it parses each inbound
/// frame, answers state-free events itself, and forwards everything that
/// touches shared state to the coordinator actor. Transport close at any
/// point, graceful or abrupt, triggers exactly one Disconnect, which drives
/// deregistration and the final directory broadcast.
use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::warn;
use uuid::Uuid;

use crate::server::ws_error::ws_session_kicked_message;
use super::messages::{ClientEvent, Outbound, ServerEvent, SessionKicked};
use super::payload::StatePayload;
use super::server::{
    BindPlayer, Connect, CoordinatorServer, Disconnect, JoinLobby, PostChat, StartMatch,
    UnbindPlayer,
};

/// Represents one client's WebSocket session.
pub struct ClientSession {
    pub conn_id: Uuid,
    pub coordinator_addr: Addr<CoordinatorServer>,
}

impl ClientSession {
    pub fn new(coordinator_addr: Addr<CoordinatorServer>) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            coordinator_addr,
        }
    }

    /// Serialize and send a server event straight to this client.
    fn send_event(&self, ctx: &mut ws::WebsocketContext<Self>, event: &ServerEvent) {
        match serde_json::to_string(event) {
            Ok(text) => ctx.text(text),
            Err(e) => warn!("[Session] Failed to serialize reply: {}", e),
        }
    }

    /// Dispatch one parsed client event.
    fn dispatch(&mut self, event: ClientEvent, ctx: &mut ws::WebsocketContext<Self>) {
        match event {
            ClientEvent::PlayerConnected { player_id } => {
                self.coordinator_addr.do_send(BindPlayer {
                    conn_id: self.conn_id,
                    player_id,
                });
            }
            ClientEvent::PlayerDisconnected => {
                self.coordinator_addr.do_send(UnbindPlayer {
                    conn_id: self.conn_id,
                });
            }
            ClientEvent::StateUpdate { state } => {
                // Structural validation only; errors go back to this client
                // alone and never terminate the connection.
                match StatePayload::parse(state.as_ref()) {
                    Ok(state) => self.send_event(ctx, &ServerEvent::StateUpdate { state }),
                    Err(detail) => self.send_event(ctx, &ServerEvent::Error { detail }),
                }
            }
            ClientEvent::ScoreUpdate { score } => {
                self.send_event(ctx, &ServerEvent::ScoreUpdate { score });
            }
            ClientEvent::MatchStart { lobby } => {
                // A missing or empty lobby name is dropped without a reply.
                if let Some(lobby) = lobby.filter(|l| !l.is_empty()) {
                    self.coordinator_addr.do_send(StartMatch {
                        conn_id: self.conn_id,
                        lobby,
                    });
                }
            }
            ClientEvent::JoinLobby { lobby } => {
                if let Some(lobby) = lobby.filter(|l| !l.is_empty()) {
                    self.coordinator_addr.do_send(JoinLobby {
                        conn_id: self.conn_id,
                        lobby,
                    });
                }
            }
            ClientEvent::ChatMessage { lobby, message } => {
                if let (Some(lobby), Some(text)) = (lobby.filter(|l| !l.is_empty()), message) {
                    self.coordinator_addr.do_send(PostChat {
                        conn_id: self.conn_id,
                        lobby,
                        text,
                    });
                }
            }
            ClientEvent::MatchEnd => {
                self.send_event(ctx, &ServerEvent::MatchEnd);
            }
        }
    }
}

impl Actor for ClientSession {
    type Context = ws::WebsocketContext<Self>;

    /// Called when the session starts. Registers the connection with the
    /// coordinator.
    fn started(&mut self, ctx: &mut Self::Context) {
        self.coordinator_addr.do_send(Connect {
            conn_id: self.conn_id,
            addr: ctx.address(),
        });
    }

    /// Called exactly once when the session stops, however the connection
    /// terminated. Drives the close cleanup in the coordinator.
    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.coordinator_addr.do_send(Disconnect {
            conn_id: self.conn_id,
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ClientSession {
    /// Handles incoming WebSocket frames from the client.
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => self.dispatch(event, ctx),
                    // Unknown event kinds and malformed frames are dropped.
                    Err(_) => (),
                }
            }
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(_)) => ctx.stop(),
            _ => (),
        }
    }
}

/// Echo/result frames addressed to this client alone.
impl Handler<ServerEvent> for ClientSession {
    type Result = ();

    fn handle(&mut self, msg: ServerEvent, ctx: &mut Self::Context) {
        self.send_event(ctx, &msg);
    }
}

/// Broadcast frames, already serialized by the coordinator.
impl Handler<Outbound> for ClientSession {
    type Result = ();

    fn handle(&mut self, msg: Outbound, ctx: &mut Self::Context) {
        ctx.text(msg.0.as_ref());
    }
}

impl Handler<SessionKicked> for ClientSession {
    type Result = ();

    /// Another connection bound this session's player identity: tell the
    /// client and close.
    fn handle(&mut self, msg: SessionKicked, ctx: &mut Self::Context) {
        ctx.text(ws_session_kicked_message(Some(&msg.reason)));
        ctx.close(Some(ws::CloseReason {
            code: ws::CloseCode::Policy,
            description: Some(msg.reason),
        }));
        ctx.stop();
    }
}

/// WebSocket endpoint for game clients.
///
/// Identity is not carried in the URL; clients announce it with a
/// `player_connected` event after the upgrade.
pub async fn ws_game(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    ws::start(
        ClientSession::new(data.coordinator_addr.clone()),
        &req,
        stream,
    )
}
