/// Coordinator server actor.
///
/// Owns the connection registry and the lobby directory, and serializes every
/// mutation through its mailbox: sessions never touch shared state directly.
/// Also implements the fan-out side, pushing directory snapshots and chat
/// relays to every connection.

use actix::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use log::{debug, warn};
use serde::Serialize;

use super::directory::LobbyDirectory;
use super::messages::{LobbyList, Outbound, ServerEvent, SessionKicked};
use super::registry::ConnectionRegistry;
use super::session::ClientSession;
use super::types::ChatRecord;

type SessionAddr = Addr<ClientSession>;

/// Main coordinator actor.
pub struct CoordinatorServer {
    /// Live connections and their player bindings.
    registry: ConnectionRegistry,
    /// Session addresses for fan-out, keyed by connection id.
    peers: HashMap<Uuid, SessionAddr>,
    /// Named lobbies and their chat history.
    directory: LobbyDirectory,
}

impl CoordinatorServer {
    /// Create a new coordinator with no connections and no lobbies.
    pub fn new() -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            peers: HashMap::new(),
            directory: LobbyDirectory::new(),
        }
    }

    /// Serialize an event once and hand the text to every live session.
    ///
    /// Delivery to a session that is already stopping is silently dropped;
    /// the connection set is only ever trimmed by that session's own
    /// Disconnect, never by the broadcast.
    fn broadcast_all<T: Serialize>(&self, event: &T) {
        let text: Arc<str> = match serde_json::to_string(event) {
            Ok(text) => text.into(),
            Err(e) => {
                warn!("[Coordinator] Failed to serialize broadcast: {}", e);
                return;
            }
        };
        for addr in self.peers.values() {
            addr.do_send(Outbound(text.clone()));
        }
    }

    /// Push the current lobby-name list to every connection. The snapshot is
    /// taken here, inside the handler that changed it.
    fn broadcast_directory(&self) {
        self.broadcast_all(&LobbyList::new(self.directory.names()));
    }

    /// Relay a chat record to every connection, tagged with its lobby.
    fn broadcast_chat(&self, lobby: String, message: ChatRecord) {
        self.broadcast_all(&ServerEvent::ChatMessage { lobby, message });
    }

    /// Send an echo/result frame to one connection, if it is still live.
    fn send_to(&self, conn_id: Uuid, event: ServerEvent) {
        if let Some(addr) = self.peers.get(&conn_id) {
            addr.do_send(event);
        }
    }
}

/// Message: a connection was accepted.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub conn_id: Uuid,
    pub addr: SessionAddr,
}

/// Message: a connection closed, gracefully or not. Sent exactly once per
/// connection, by the session actor's `stopped` callback.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub conn_id: Uuid,
}

/// Message: `player_connected`. Binds a player identity to a connection.
#[derive(Message)]
#[rtype(result = "()")]
pub struct BindPlayer {
    pub conn_id: Uuid,
    pub player_id: Option<String>,
}

/// Message: `player_disconnected`. Clears the binding and leaves all lobbies,
/// ahead of the physical close.
#[derive(Message)]
#[rtype(result = "()")]
pub struct UnbindPlayer {
    pub conn_id: Uuid,
}

/// Message: `match_start`. Creates or joins a lobby.
#[derive(Message)]
#[rtype(result = "()")]
pub struct StartMatch {
    pub conn_id: Uuid,
    pub lobby: String,
}

/// Message: `join_lobby`. Joins an existing lobby.
#[derive(Message)]
#[rtype(result = "()")]
pub struct JoinLobby {
    pub conn_id: Uuid,
    pub lobby: String,
}

/// Message: `chat_message`. Appends to a lobby chat history and relays it.
#[derive(Message)]
#[rtype(result = "()")]
pub struct PostChat {
    pub conn_id: Uuid,
    pub lobby: String,
    pub text: String,
}

impl Actor for CoordinatorServer {
    type Context = Context<Self>;
}

impl Handler<Connect> for CoordinatorServer {
    type Result = ();

    /// Registers an accepted connection. No broadcast: the directory does not
    /// change until the client binds an identity or touches a lobby.
    fn handle(&mut self, msg: Connect, _ctx: &mut Self::Context) -> Self::Result {
        self.registry.register(msg.conn_id);
        self.peers.insert(msg.conn_id, msg.addr);
        debug!(
            "[Coordinator] Connection {} accepted ({} connected)",
            msg.conn_id,
            self.registry.len()
        );
    }
}

impl Handler<Disconnect> for CoordinatorServer {
    type Result = ();

    /// Runs the close cleanup: deregister, drop lobby memberships of the
    /// still-bound identity, and push a fresh directory snapshot.
    fn handle(&mut self, msg: Disconnect, _ctx: &mut Self::Context) -> Self::Result {
        self.peers.remove(&msg.conn_id);
        if let Some(player) = self.registry.deregister(msg.conn_id) {
            self.directory.leave_all(&player);
            debug!("[Coordinator] Player {} disconnected", player);
        }
        debug!(
            "[Coordinator] Connection {} closed ({} connected)",
            msg.conn_id,
            self.registry.len()
        );
        self.broadcast_directory();
    }
}

impl Handler<BindPlayer> for CoordinatorServer {
    type Result = ();

    /// Binds a player identity to the connection. If the identity is already
    /// bound on another connection, that older session is kicked and loses
    /// the binding; its lobby memberships stay with the player.
    fn handle(&mut self, msg: BindPlayer, _ctx: &mut Self::Context) -> Self::Result {
        if let Some(player_id) = msg.player_id.clone() {
            if let Some(displaced) = self.registry.bind(msg.conn_id, player_id.clone()) {
                if let Some(old) = self.peers.get(&displaced) {
                    old.do_send(SessionKicked {
                        reason: "Another connection has bound your player id.".to_string(),
                    });
                }
                debug!(
                    "[Coordinator] Player {} rebound to a new connection (old session kicked)",
                    player_id
                );
            } else {
                debug!("[Coordinator] Player {} connected", player_id);
            }
        }
        self.send_to(msg.conn_id, ServerEvent::PlayerConnected {
            player_id: msg.player_id,
        });
        self.broadcast_directory();
    }
}

impl Handler<UnbindPlayer> for CoordinatorServer {
    type Result = ();

    /// Clears the binding and removes the player from every lobby. The
    /// connection itself stays registered until the physical close.
    fn handle(&mut self, msg: UnbindPlayer, _ctx: &mut Self::Context) -> Self::Result {
        let player = self.registry.unbind(msg.conn_id);
        if let Some(player) = player.as_deref() {
            self.directory.leave_all(player);
            debug!("[Coordinator] Player {} unbound", player);
        }
        self.send_to(msg.conn_id, ServerEvent::PlayerDisconnected { player_id: player });
        self.broadcast_directory();
    }
}

impl Handler<StartMatch> for CoordinatorServer {
    type Result = ();

    /// Creates the lobby if needed and appends the caller as a member.
    fn handle(&mut self, msg: StartMatch, _ctx: &mut Self::Context) -> Self::Result {
        let player = self.registry.player_of(msg.conn_id).cloned();
        self.directory.start_match(&msg.lobby, player);
        debug!("[Coordinator] Match started in lobby {:?}", msg.lobby);
        self.send_to(msg.conn_id, ServerEvent::MatchStart { lobby: msg.lobby });
        self.broadcast_directory();
    }
}

impl Handler<JoinLobby> for CoordinatorServer {
    type Result = ();

    /// Appends the caller to an existing lobby and replays its chat history.
    /// Joining a lobby that does not exist is silently dropped.
    fn handle(&mut self, msg: JoinLobby, _ctx: &mut Self::Context) -> Self::Result {
        let player = self.registry.player_of(msg.conn_id).cloned();
        match self.directory.join(&msg.lobby, player) {
            Some(history) => {
                self.send_to(msg.conn_id, ServerEvent::JoinLobby {
                    lobby: msg.lobby.clone(),
                });
                self.broadcast_directory();
                self.send_to(msg.conn_id, ServerEvent::ChatHistory {
                    lobby: msg.lobby,
                    messages: history,
                });
            }
            None => {
                debug!("[Coordinator] join_lobby ignored: no lobby named {:?}", msg.lobby);
            }
        }
    }
}

impl Handler<PostChat> for CoordinatorServer {
    type Result = ();

    /// Appends a chat message and relays it. Posting to a lobby that does not
    /// exist, or with empty text, is silently dropped.
    fn handle(&mut self, msg: PostChat, _ctx: &mut Self::Context) -> Self::Result {
        let sender = self.registry.player_of(msg.conn_id).cloned();
        match self.directory.post_chat(&msg.lobby, sender, &msg.text) {
            Some(record) => self.broadcast_chat(msg.lobby, record),
            None => {
                debug!("[Coordinator] chat_message ignored for lobby {:?}", msg.lobby);
            }
        }
    }
}
