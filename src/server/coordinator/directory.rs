//! Lobby directory: named member lists plus per-lobby chat history.
//!
//! Pure data structure owned by the coordinator actor. A lobby exists
//! exactly as long as its member list is non-empty: created on the first
//! `match_start` naming it, deleted when a removal empties it. The chat
//! history shares the lobby's lifetime.

use std::collections::HashMap;

use chrono::Utc;

use super::types::{ChatRecord, PlayerId};

/// One lobby: insertion-ordered members and chat log.
///
/// A member entry is `None` when the joining connection had no player
/// identity bound at the time. Member lists are never sent to clients, only
/// lobby names are.
struct Lobby {
    members: Vec<Option<PlayerId>>,
    chat: Vec<ChatRecord>,
}

/// Directory of all live lobbies, keyed by name.
#[derive(Default)]
pub struct LobbyDirectory {
    lobbies: HashMap<String, Lobby>,
}

impl LobbyDirectory {
    pub fn new() -> Self {
        Self {
            lobbies: HashMap::new(),
        }
    }

    /// Create the lobby if absent (with an empty chat history) and append
    /// `player` to its member list. Duplicates are kept.
    pub fn start_match(&mut self, name: &str, player: Option<PlayerId>) {
        let lobby = self.lobbies.entry(name.to_string()).or_insert_with(|| Lobby {
            members: Vec::new(),
            chat: Vec::new(),
        });
        lobby.members.push(player);
    }

    /// Append `player` to an existing lobby and hand back its chat history
    /// for replay. `None` when no such lobby exists.
    pub fn join(&mut self, name: &str, player: Option<PlayerId>) -> Option<Vec<ChatRecord>> {
        let lobby = self.lobbies.get_mut(name)?;
        lobby.members.push(player);
        Some(lobby.chat.clone())
    }

    /// Remove every occurrence of `player` from every member list. Lobbies
    /// emptied by the removal are deleted together with their chat history.
    pub fn leave_all(&mut self, player: &str) {
        self.lobbies.retain(|_, lobby| {
            lobby.members.retain(|m| m.as_deref() != Some(player));
            !lobby.members.is_empty()
        });
    }

    /// Append a chat message to an existing lobby, stamped with the current
    /// UTC time. Returns the appended record for broadcast, or `None` when
    /// the lobby does not exist or the text is empty (both are dropped
    /// silently upstream).
    pub fn post_chat(
        &mut self,
        name: &str,
        sender: Option<PlayerId>,
        text: &str,
    ) -> Option<ChatRecord> {
        if text.is_empty() {
            return None;
        }
        let lobby = self.lobbies.get_mut(name)?;
        let record = ChatRecord {
            player_id: sender,
            message: text.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        };
        lobby.chat.push(record.clone());
        Some(record)
    }

    /// Names of all live lobbies, for the directory broadcast.
    pub fn names(&self) -> Vec<String> {
        self.lobbies.keys().cloned().collect()
    }

    #[cfg(test)]
    pub(crate) fn members(&self, name: &str) -> Option<&[Option<PlayerId>]> {
        self.lobbies.get(name).map(|l| l.members.as_slice())
    }

    #[cfg(test)]
    pub(crate) fn history(&self, name: &str) -> Option<&[ChatRecord]> {
        self.lobbies.get(name).map(|l| l.chat.as_slice())
    }
}
