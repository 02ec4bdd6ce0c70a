//! Cart API Handlers
//!
//! 所有接口都要求登录；购物车行只属于当前用户。

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::validation::{MAX_QUANTITY, validate_quantity};
use crate::utils::{AppError, AppResult};
use shared::models::{CartAdd, CartItem, CartLine, CartSetQuantity};

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub removed: u64,
}

/// GET /api/cart - 当前用户购物车 (含菜品与餐厅详情)
pub async fn get_cart(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<Vec<CartLine>>> {
    let lines = state.store.cart_lines(&current.id).await?;
    Ok(Json(lines))
}

/// POST /api/cart - 加入购物车 (已有行累加数量)
pub async fn add(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(payload): Json<CartAdd>,
) -> AppResult<Json<CartItem>> {
    validate_quantity(payload.quantity)?;

    let item = state
        .store
        .find_food_item(&payload.food_item_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Food item {} not found", payload.food_item_id))
        })?;
    if !item.is_available {
        return Err(AppError::validation(format!(
            "'{}' is currently unavailable",
            item.name
        )));
    }

    let now_ms = chrono::Utc::now().timestamp_millis();
    let cart_item = state
        .store
        .add_to_cart(&current.id, &payload.food_item_id, payload.quantity, now_ms)
        .await?;
    Ok(Json(cart_item))
}

/// PUT /api/cart/:food_item_id - 设置数量 (0 表示删除)
pub async fn set_quantity(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(food_item_id): Path<String>,
    Json(payload): Json<CartSetQuantity>,
) -> AppResult<Json<Option<CartItem>>> {
    if payload.quantity < 0 || payload.quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity must be between 0 and {MAX_QUANTITY}, got {}",
            payload.quantity
        )));
    }

    let item = state
        .store
        .set_cart_quantity(&current.id, &food_item_id, payload.quantity)
        .await?;
    Ok(Json(item))
}

/// DELETE /api/cart/:food_item_id - 删除一行
pub async fn remove(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(food_item_id): Path<String>,
) -> AppResult<Json<bool>> {
    let removed = state
        .store
        .remove_cart_item(&current.id, &food_item_id)
        .await?;
    if !removed {
        return Err(AppError::not_found(format!(
            "Cart item {food_item_id} not found"
        )));
    }
    Ok(Json(true))
}

/// DELETE /api/cart - 清空购物车
pub async fn clear(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<ClearResponse>> {
    let removed = state.store.clear_cart(&current.id).await?;
    Ok(Json(ClearResponse { removed }))
}
