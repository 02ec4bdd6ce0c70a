//! Admin API Handlers
//!
//! 管理端只读面板。所有接口经 [`AdminUser`] 门禁。

use axum::{Json, extract::State};

use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::store::AdminAnalytics;
use crate::utils::AppResult;
use shared::models::{Order, User};

/// GET /api/admin/analytics - 汇总统计
pub async fn analytics(
    State(state): State<ServerState>,
    _admin: AdminUser,
) -> AppResult<Json<AdminAnalytics>> {
    let analytics = state.store.analytics().await?;
    Ok(Json(analytics))
}

/// GET /api/admin/users - 用户列表
pub async fn users(
    State(state): State<ServerState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<User>>> {
    let users = state.store.list_users().await?;
    Ok(Json(users))
}

/// GET /api/admin/orders - 全量订单，倒序
pub async fn orders(
    State(state): State<ServerState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.store.list_all_orders().await?;
    Ok(Json(orders))
}
