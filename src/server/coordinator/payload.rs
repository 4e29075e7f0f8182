//! Structural contract for a player's synchronized state.
//!
//! Validation is shape-only: field presence and types. Numeric ranges and
//! gameplay semantics are not checked here.

use serde::{Serialize, Deserialize};
use serde_json::Value;

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// One tracked object and its opaque state mapping.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct ObjectState {
    pub id: String,
    pub state: serde_json::Map<String, Value>,
}

/// Synchronized player state: transform, animation, sound, and object states.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct StatePayload {
    pub player_id: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub velocity: Vec3,
    pub animation: String,
    pub sound: String,
    pub objects: Vec<ObjectState>,
}

impl StatePayload {
    /// Validate the structural shape of a `state_update` payload.
    ///
    /// `None` means the client sent no `state` field at all. The error string
    /// goes back to the sender verbatim as the `detail` of an error event.
    pub fn parse(state: Option<&Value>) -> Result<StatePayload, String> {
        match state {
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| e.to_string()),
            None => Err("missing state payload".to_string()),
        }
    }
}
