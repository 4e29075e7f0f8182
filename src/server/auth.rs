//! Credential registration and login.
//!
//! A process-lifetime, in-memory store: `register` is a plain key-value
//! insert and `verify` a lookup. WebSocket sessions are not authenticated
//! against it; clients call these HTTP endpoints separately.

use std::collections::HashMap;
use std::sync::Mutex;

use actix_web::{web, HttpResponse, http::StatusCode};
use log::debug;
use serde::{Serialize, Deserialize};

use crate::server::ws_error::http_error_response;

/// In-memory username -> password store.
#[derive(Default)]
pub struct CredentialStore {
    users: Mutex<HashMap<String, String>>,
}

impl CredentialStore {
    /// Insert a credential pair. `false` when the username is already taken.
    pub fn register(&self, username: &str, password: &str) -> bool {
        let mut users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        if users.contains_key(username) {
            return false;
        }
        users.insert(username.to_string(), password.to_string());
        true
    }

    /// Check a credential pair against the store.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        users.get(username).map(String::as_str) == Some(password)
    }
}

#[derive(Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
struct AuthReply {
    message: &'static str,
}

/// `POST /register`: create a credential entry.
pub async fn register_player(
    store: web::Data<CredentialStore>,
    body: web::Json<Credentials>,
) -> HttpResponse {
    let creds = body.into_inner();
    if !store.register(&creds.username, &creds.password) {
        return http_error_response(
            "USERNAME_TAKEN",
            "Username already exists",
            Some(&creds.username),
            StatusCode::BAD_REQUEST,
        );
    }
    debug!("[Auth] Registered player {}", creds.username);
    HttpResponse::Ok().json(AuthReply {
        message: "Player registered successfully",
    })
}

/// `POST /login`: verify a credential pair.
pub async fn login_player(
    store: web::Data<CredentialStore>,
    body: web::Json<Credentials>,
) -> HttpResponse {
    let creds = body.into_inner();
    if !store.verify(&creds.username, &creds.password) {
        return http_error_response(
            "INVALID_CREDENTIALS",
            "Invalid credentials",
            None,
            StatusCode::UNAUTHORIZED,
        );
    }
    HttpResponse::Ok().json(AuthReply {
        message: "Login successful",
    })
}
