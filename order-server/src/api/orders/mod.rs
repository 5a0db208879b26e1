//! Order API Module
//!
//! All mutations go through the `OrderManager`; handlers never touch the
//! order tables directly.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/checkout", post(handler::checkout))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/pay", post(handler::pay))
        .route("/{id}/payments", get(handler::list_payments))
}
