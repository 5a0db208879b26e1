//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::db::repository::product;
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::Product;
use shared::models::product::{ProductCreate, ProductSetPrice};

fn require_staff(actor: &CurrentActor) -> Result<(), AppError> {
    if actor.actor().is_elevated() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Staff role required".to_string()))
    }
}

/// GET /api/products
pub async fn list(
    State(state): State<ServerState>,
    _actor: CurrentActor,
) -> AppResult<Json<AppResponse<Vec<Product>>>> {
    let products = product::find_all(&state.db.pool).await?;
    Ok(ok(products))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    _actor: CurrentActor,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Product>>> {
    let product = product::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id}")))?;
    Ok(ok(product))
}

/// POST /api/products (staff)
pub async fn create(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<AppResponse<Product>>> {
    require_staff(&actor)?;
    let created = product::create(&state.db.pool, payload).await?;
    tracing::info!(product_id = created.id, name = %created.name, "Product created");
    Ok(ok(created))
}

/// PUT /api/products/{id}/price (staff)
///
/// Only affects future checkouts; existing orders keep their snapshots.
pub async fn set_price(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<i64>,
    Json(payload): Json<ProductSetPrice>,
) -> AppResult<Json<AppResponse<Product>>> {
    require_staff(&actor)?;
    let updated = product::set_price(&state.db.pool, id, payload.unit_price).await?;
    tracing::info!(product_id = id, unit_price = %payload.unit_price, "Product price updated");
    Ok(ok(updated))
}
