//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::db::repository::{cart, product};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};
use shared::models::CartItem;
use shared::order::{AddCartItemRequest, UpdateCartItemRequest};

/// GET /api/cart
pub async fn list(
    State(state): State<ServerState>,
    actor: CurrentActor,
) -> AppResult<Json<AppResponse<Vec<CartItem>>>> {
    let items = cart::items_for_customer(&state.db.pool, actor.actor().id).await?;
    Ok(ok(items))
}

/// POST /api/cart/items
///
/// Adding the same product again accumulates its quantity.
pub async fn add_item(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Json(payload): Json<AddCartItemRequest>,
) -> AppResult<Json<AppResponse<CartItem>>> {
    // Stock is not checked here; only checkout reserves.
    let exists = product::find_by_id(&state.db.pool, payload.product_id)
        .await?
        .is_some();
    if !exists {
        return Err(AppError::not_found(format!(
            "Product {}",
            payload.product_id
        )));
    }

    let item = cart::add_item(
        &state.db.pool,
        actor.actor().id,
        payload.product_id,
        payload.quantity,
    )
    .await?;
    Ok(ok(item))
}

/// PUT /api/cart/items/{id}
pub async fn update_item(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCartItemRequest>,
) -> AppResult<Json<AppResponse<CartItem>>> {
    let item = cart::update_quantity(&state.db.pool, actor.actor().id, id, payload.quantity).await?;
    Ok(ok(item))
}

/// DELETE /api/cart/items/{id}
pub async fn remove_item(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    cart::remove_item(&state.db.pool, actor.actor().id, id).await?;
    Ok(ok_with_message((), "Removed"))
}

/// DELETE /api/cart
pub async fn clear(
    State(state): State<ServerState>,
    actor: CurrentActor,
) -> AppResult<Json<AppResponse<()>>> {
    cart::clear(&state.db.pool, actor.actor().id).await?;
    Ok(ok_with_message((), "Cart cleared"))
}
