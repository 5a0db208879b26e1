//! API routing module
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`products`] - product catalog (staff mutations)
//! - [`cart`] - the caller's shopping cart
//! - [`orders`] - checkout and order lifecycle

pub mod cart;
pub mod health;
pub mod orders;
pub mod products;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble the full application router
pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(products::router())
        .merge(cart::router())
        .merge(orders::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
