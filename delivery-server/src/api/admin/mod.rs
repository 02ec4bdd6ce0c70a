//! Admin API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/analytics", get(handler::analytics))
        .route("/users", get(handler::users))
        .route("/orders", get(handler::orders))
}
