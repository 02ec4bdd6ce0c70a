//! Cart API 模块

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get_cart).post(handler::add).delete(handler::clear))
        .route(
            "/{food_item_id}",
            put(handler::set_quantity).delete(handler::remove),
        )
}
