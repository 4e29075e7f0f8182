//! HTTP and WebSocket routing configuration.
//!
//! Defines the game WebSocket endpoint and the credential endpoints.
//! The WebSocket endpoint is handled by a dedicated actor per connection.

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::server::auth::{login_player, register_player};
use crate::server::coordinator::session::ws_game;

/// Liveness probe.
async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "ChronoSync API online" }))
}

/// Configure the application's HTTP/WebSocket routes.
///
/// The game endpoint is handled by its session actor, which manages the
/// connection lifecycle and relays events to the coordinator.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/register").route(web::post().to(register_player)))
        .service(web::resource("/login").route(web::post().to(login_player)))
        .service(web::resource("/ws/game").to(ws_game));
}
