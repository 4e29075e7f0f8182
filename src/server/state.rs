// src/server/state.rs

//! Application state for the backend server.
//!
//! Holds a reference to the coordinator actor address.
//! Used to share state between HTTP/WebSocket handlers and the actor system.

use actix::Addr;
use crate::server::coordinator::CoordinatorServer;

/// Shared application state, injected into HTTP/WebSocket handlers.
pub struct AppState {
    /// Address of the coordinator actor (connections, lobbies, broadcasts).
    pub coordinator_addr: Addr<CoordinatorServer>,
}

impl AppState {
    /// Create a new AppState with the given actor address.
    pub fn new(coordinator_addr: Addr<CoordinatorServer>) -> Self {
        AppState { coordinator_addr }
    }
}
