//! Cart API Module
//!
//! Every route operates on the calling actor's own cart.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).delete(handler::clear))
        .route("/items", post(handler::add_item))
        .route(
            "/items/{id}",
            put(handler::update_item).delete(handler::remove_item),
        )
}
