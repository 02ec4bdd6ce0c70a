//! Auth API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/verify", post(handler::verify))
        .route("/login", post(handler::login))
        .route("/me", get(handler::me))
        .route("/profile", put(handler::update_profile))
}
