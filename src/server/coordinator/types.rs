use serde::{Serialize, Deserialize};

/// Opaque player identifier supplied by the client at connect time.
/// Not authenticated against the credential store; uniqueness within a
/// process run is the caller's responsibility.
pub type PlayerId = String;

/// One chat message, as stored in a lobby's history and relayed to clients.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChatRecord {
    /// Sender identity; null when the sending connection never bound one.
    pub player_id: Option<PlayerId>,
    pub message: String,
    /// RFC 3339 UTC timestamp, assigned when the message is appended.
    pub timestamp: String,
}
