use std::sync::Arc;

use actix::prelude::*;
use serde::{Serialize, Deserialize};
use serde_json::Value;

use super::payload::StatePayload;
use super::types::ChatRecord;

/// Client -> server frames, tagged by `event`.
///
/// Fields are optional wherever the protocol tolerates their absence; the
/// handlers decide whether a missing field means "drop" or "error". Unknown
/// fields are ignored, unknown `event` kinds fail to parse and are dropped.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    PlayerConnected {
        #[serde(default)]
        player_id: Option<String>,
    },
    PlayerDisconnected,
    StateUpdate {
        #[serde(default)]
        state: Option<Value>,
    },
    ScoreUpdate {
        #[serde(default)]
        score: Option<Value>,
    },
    MatchStart {
        #[serde(default)]
        lobby: Option<String>,
    },
    JoinLobby {
        #[serde(default)]
        lobby: Option<String>,
    },
    ChatMessage {
        #[serde(default)]
        lobby: Option<String>,
        #[serde(default)]
        message: Option<String>,
    },
    MatchEnd,
}

// Server -> client frames, tagged by `event`. Sent directly to one session
// as an echo/result, or serialized once and fanned out as an Outbound.
#[derive(Message, Serialize, Deserialize, Clone, Debug)]
#[rtype(result = "()")]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerEvent {
    PlayerConnected {
        player_id: Option<String>,
    },
    PlayerDisconnected {
        player_id: Option<String>,
    },
    StateUpdate {
        state: StatePayload,
    },
    ScoreUpdate {
        score: Option<Value>,
    },
    MatchStart {
        lobby: String,
    },
    JoinLobby {
        lobby: String,
    },
    ChatHistory {
        lobby: String,
        messages: Vec<ChatRecord>,
    },
    ChatMessage {
        lobby: String,
        message: ChatRecord,
    },
    MatchEnd,
    Error {
        detail: String,
    },
}

/// Directory snapshot pushed to every connection after a membership change.
///
/// This frame keeps the legacy `eventName` discriminator; clients key on it.
/// Every other frame uses `event`.
#[derive(Serialize, Clone, Debug)]
pub struct LobbyList {
    #[serde(rename = "eventName")]
    pub event_name: &'static str,
    pub lobbies: Vec<String>,
}

impl LobbyList {
    pub fn new(lobbies: Vec<String>) -> Self {
        Self {
            event_name: "lobby_list",
            lobbies,
        }
    }
}

/// A pre-serialized frame fanned out to every connection. Serialized once by
/// the broadcaster; sessions forward the text as-is.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct Outbound(pub Arc<str>);

/// Tells a session that a newer connection has bound its player identity.
/// The session notifies the client and closes.
#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub struct SessionKicked {
    pub reason: String,
}
