//! Category API Handlers

use axum::{Json, extract::State};

use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::utils::validation::{MAX_NAME_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppResult, ids};
use shared::models::{Category, CategoryCreate};

/// GET /api/categories - 获取所有分类
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = state.store.list_categories().await?;
    Ok(Json(categories))
}

/// POST /api/categories - 创建分类 (admin)
pub async fn create(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;

    let category = Category {
        id: ids::new_id(),
        name: payload.name.trim().to_string(),
        image_url: payload.image_url,
    };

    let category = state.store.create_category(category).await?;
    tracing::info!(category_id = %category.id, name = %category.name, "Category created");
    Ok(Json(category))
}
