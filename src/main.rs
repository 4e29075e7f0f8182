//! Main entry point for the backend server.
//!
//! Initializes the actor system, configures application state, and launches the HTTP server
//! with the WebSocket endpoint for game sessions.

use actix::Actor;
use actix_web::{web, App, HttpServer};
use server::auth::CredentialStore;
use server::coordinator::CoordinatorServer;

pub mod config;
mod server;
#[cfg(test)]
mod tests;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from the RUST_LOG environment variable.
    env_logger::init();

    // Start the coordinator actor (owns connections, lobbies, chat history).
    let coordinator_addr = CoordinatorServer::new().start();

    // Shared application state for HTTP/WebSocket handlers.
    let state = web::Data::new(server::state::AppState::new(coordinator_addr));

    // In-memory credential store backing /register and /login.
    let credentials = web::Data::new(CredentialStore::default());

    // Start the HTTP server with the WebSocket endpoint.
    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*"))
            )
            .app_data(state.clone())
            .app_data(credentials.clone())
            .configure(crate::server::router::config)
    })
    .bind((config::server::HOST, config::server::PORT))?
    .run()
    .await
}
