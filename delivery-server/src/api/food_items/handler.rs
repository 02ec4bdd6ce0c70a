//! Food Item API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_amount, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ids};
use shared::models::{FoodItem, FoodItemCreate, FoodItemUpdate};

/// Query params for the filtered menu
#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub restaurant_id: Option<String>,
    pub category_id: Option<String>,
}

/// GET /api/food-items?restaurant_id&category_id - 过滤后的菜单
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<Vec<FoodItem>>> {
    let items = state
        .store
        .list_food_items(query.restaurant_id.as_deref(), query.category_id.as_deref())
        .await?;
    Ok(Json(items))
}

/// POST /api/food-items - 创建菜品 (admin)
pub async fn create(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Json(payload): Json<FoodItemCreate>,
) -> AppResult<Json<FoodItem>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    validate_amount(payload.price, "price")?;

    // Both parents must exist before the item becomes orderable
    state
        .store
        .find_restaurant(&payload.restaurant_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Restaurant {} not found", payload.restaurant_id))
        })?;
    let categories = state.store.list_categories().await?;
    if !categories.iter().any(|c| c.id == payload.category_id) {
        return Err(AppError::not_found(format!(
            "Category {} not found",
            payload.category_id
        )));
    }

    let item = FoodItem {
        id: ids::new_id(),
        restaurant_id: payload.restaurant_id,
        category_id: payload.category_id,
        name: payload.name.trim().to_string(),
        description: payload.description,
        price: payload.price,
        is_available: payload.is_available.unwrap_or(true),
        is_veg: payload.is_veg.unwrap_or(false),
        image_url: payload.image_url,
        created_at: chrono::Utc::now().timestamp_millis(),
    };

    let item = state.store.create_food_item(item).await?;
    tracing::info!(food_item_id = %item.id, name = %item.name, "Food item created");
    Ok(Json(item))
}

/// PUT /api/food-items/:id - 更新价格 / 上下架 (admin)
pub async fn update(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<FoodItemUpdate>,
) -> AppResult<Json<FoodItem>> {
    let mut item = state
        .store
        .find_food_item(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Food item {id} not found")))?;

    if let Some(name) = payload.name {
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        item.name = name.trim().to_string();
    }
    if let Some(description) = payload.description {
        validate_required_text(&description, "description", MAX_NOTE_LEN)?;
        item.description = Some(description);
    }
    if let Some(price) = payload.price {
        validate_amount(price, "price")?;
        item.price = price;
    }
    if let Some(is_available) = payload.is_available {
        item.is_available = is_available;
    }
    if let Some(is_veg) = payload.is_veg {
        item.is_veg = is_veg;
    }
    if let Some(image_url) = payload.image_url {
        validate_required_text(&image_url, "image_url", MAX_URL_LEN)?;
        item.image_url = Some(image_url);
    }
    if let Some(category_id) = payload.category_id {
        let categories = state.store.list_categories().await?;
        if !categories.iter().any(|c| c.id == category_id) {
            return Err(AppError::not_found(format!(
                "Category {category_id} not found"
            )));
        }
        item.category_id = category_id;
    }

    let item = state.store.update_food_item(&item).await?;
    Ok(Json(item))
}
