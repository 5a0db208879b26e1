//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::db::repository::payment;
use crate::utils::{AppResponse, AppResult, ok};
use shared::models::{Order, Payment};
use shared::order::{CheckoutRequest, PayRequest, UpdateStatusRequest};

/// POST /api/orders/checkout
pub async fn checkout(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.checkout(actor.actor().id, payload).await?;
    Ok(ok(order))
}

/// GET /api/orders — the calling customer's own orders
pub async fn list(
    State(state): State<ServerState>,
    actor: CurrentActor,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let orders = state.orders.list_orders(actor.actor().id).await?;
    Ok(ok(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.get_order(id, actor.actor()).await?;
    Ok(ok(order))
}

/// PUT /api/orders/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state
        .orders
        .update_status(id, payload.status, actor.actor())
        .await?;
    Ok(ok(order))
}

/// POST /api/orders/{id}/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.cancel(id, actor.actor()).await?;
    Ok(ok(order))
}

/// POST /api/orders/{id}/pay
pub async fn pay(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<i64>,
    Json(payload): Json<PayRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.pay(id, payload.method, actor.actor()).await?;
    Ok(ok(order))
}

/// GET /api/orders/{id}/payments
pub async fn list_payments(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Vec<Payment>>>> {
    // Authorization piggybacks on get_order
    state.orders.get_order(id, actor.actor()).await?;
    let payments = payment::for_order(&state.db.pool, id).await?;
    Ok(ok(payments))
}
