//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册 / 验证 / 登录 / 个人资料
//! - [`restaurants`] - 餐厅管理接口
//! - [`categories`] - 分类管理接口
//! - [`food_items`] - 菜品管理接口
//! - [`cart`] - 购物车接口
//! - [`orders`] - 订单接口 (结账、查询、状态更新)
//! - [`payment`] - 模拟支付确认
//! - [`admin`] - 管理端统计 / 用户 / 订单列表

use axum::Router;

use crate::core::ServerState;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod food_items;
pub mod health;
pub mod orders;
pub mod payment;
pub mod restaurants;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(restaurants::router())
        .merge(categories::router())
        .merge(food_items::router())
        .merge(cart::router())
        .merge(orders::router())
        .merge(payment::router())
        .merge(admin::router())
}
