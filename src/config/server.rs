/// Server configuration constants.
///
/// This module defines the bind address for the HTTP/WebSocket listener.
pub const HOST: &str = "127.0.0.1"; // Interface the listener binds to.

/// TCP port the server listens on. Game clients connect to
/// `ws://HOST:PORT/ws/game`.
pub const PORT: u16 = 8000;
