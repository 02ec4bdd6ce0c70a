//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_amount,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ids};
use shared::models::{Restaurant, RestaurantCreate, RestaurantDetail, RestaurantUpdate};

/// GET /api/restaurants - 营业中的餐厅列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Restaurant>>> {
    let restaurants = state.store.list_open_restaurants().await?;
    Ok(Json(restaurants))
}

/// GET /api/restaurants/:id - 餐厅 + 菜单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<RestaurantDetail>> {
    let detail = state
        .store
        .restaurant_detail(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {id} not found")))?;
    Ok(Json(detail))
}

/// POST /api/restaurants - 创建餐厅 (admin)
pub async fn create(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Json(payload): Json<RestaurantCreate>,
) -> AppResult<Json<Restaurant>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.cuisine, "cuisine", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    validate_amount(payload.delivery_fee, "delivery_fee")?;
    if let Some(rating) = payload.rating {
        validate_amount(rating, "rating")?;
    }

    let restaurant = Restaurant {
        id: ids::new_id(),
        name: payload.name.trim().to_string(),
        cuisine: payload.cuisine,
        rating: payload.rating.unwrap_or(0.0),
        delivery_fee: payload.delivery_fee,
        delivery_time_minutes: payload.delivery_time_minutes.unwrap_or(30),
        is_open: payload.is_open.unwrap_or(true),
        address: payload.address,
        image_url: payload.image_url,
        created_at: chrono::Utc::now().timestamp_millis(),
    };

    let restaurant = state.store.create_restaurant(restaurant).await?;
    tracing::info!(restaurant_id = %restaurant.id, name = %restaurant.name, "Restaurant created");
    Ok(Json(restaurant))
}

/// PUT /api/restaurants/:id - 更新餐厅 (admin)
pub async fn update(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<RestaurantUpdate>,
) -> AppResult<Json<Restaurant>> {
    let mut restaurant = state
        .store
        .find_restaurant(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {id} not found")))?;

    if let Some(name) = payload.name {
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        restaurant.name = name.trim().to_string();
    }
    if let Some(cuisine) = payload.cuisine {
        validate_required_text(&cuisine, "cuisine", MAX_SHORT_TEXT_LEN)?;
        restaurant.cuisine = cuisine;
    }
    if let Some(rating) = payload.rating {
        validate_amount(rating, "rating")?;
        restaurant.rating = rating;
    }
    if let Some(fee) = payload.delivery_fee {
        validate_amount(fee, "delivery_fee")?;
        restaurant.delivery_fee = fee;
    }
    if let Some(minutes) = payload.delivery_time_minutes {
        restaurant.delivery_time_minutes = minutes;
    }
    if let Some(is_open) = payload.is_open {
        restaurant.is_open = is_open;
    }
    if let Some(address) = payload.address {
        validate_required_text(&address, "address", MAX_ADDRESS_LEN)?;
        restaurant.address = address;
    }
    if let Some(image_url) = payload.image_url {
        validate_required_text(&image_url, "image_url", MAX_URL_LEN)?;
        restaurant.image_url = Some(image_url);
    }

    let restaurant = state.store.update_restaurant(&restaurant).await?;
    Ok(Json(restaurant))
}
