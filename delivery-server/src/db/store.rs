//! Persistence port
//!
//! One [`Store`] trait covering CRUD for every entity plus the composite
//! reads the views need. Two interchangeable adapters implement it:
//! [`crate::db::surreal::SurrealStore`] (embedded document store) and
//! [`crate::db::sqlite::SqliteStore`] (relational, sqlx). The backend is
//! picked once at startup — handlers and background tasks only ever see
//! `Arc<dyn Store>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared::models::{
    CartItem, CartLine, Category, FoodItem, Order, OrderDetail, OrderItem, OrderStatus,
    OrderTracking, Restaurant, RestaurantDetail, User,
};

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Aggregate numbers for the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAnalytics {
    pub users: i64,
    pub restaurants: i64,
    pub orders: i64,
    pub active_orders: i64,
    pub delivered_orders: i64,
    /// Sum of `total` over non-cancelled orders
    pub revenue: f64,
}

/// Persistence adapter interface
///
/// Entities arrive fully built (id, timestamps, snapshots already set by
/// the caller); adapters only read and write them. Not-found reads return
/// `Ok(None)` — the API layer turns that into 404.
#[async_trait]
pub trait Store: Send + Sync {
    // ========== Users ==========

    async fn create_user(&self, user: User) -> StoreResult<User>;
    async fn find_user_by_id(&self, id: &str) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Full-record update keyed by `user.id`
    async fn update_user(&self, user: &User) -> StoreResult<User>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    // ========== Restaurants ==========

    async fn create_restaurant(&self, restaurant: Restaurant) -> StoreResult<Restaurant>;
    async fn update_restaurant(&self, restaurant: &Restaurant) -> StoreResult<Restaurant>;
    async fn find_restaurant(&self, id: &str) -> StoreResult<Option<Restaurant>>;
    async fn list_open_restaurants(&self) -> StoreResult<Vec<Restaurant>>;
    /// Restaurant joined with its menu (fan-out in adapter code)
    async fn restaurant_detail(&self, id: &str) -> StoreResult<Option<RestaurantDetail>>;

    // ========== Categories ==========

    async fn create_category(&self, category: Category) -> StoreResult<Category>;
    async fn list_categories(&self) -> StoreResult<Vec<Category>>;

    // ========== Food items ==========

    async fn create_food_item(&self, item: FoodItem) -> StoreResult<FoodItem>;
    async fn update_food_item(&self, item: &FoodItem) -> StoreResult<FoodItem>;
    async fn find_food_item(&self, id: &str) -> StoreResult<Option<FoodItem>>;
    async fn list_food_items(
        &self,
        restaurant_id: Option<&str>,
        category_id: Option<&str>,
    ) -> StoreResult<Vec<FoodItem>>;

    // ========== Cart ==========

    /// Add `quantity` for the `(user, food_item)` pair; increments the
    /// existing row instead of inserting a duplicate.
    async fn add_to_cart(
        &self,
        user_id: &str,
        food_item_id: &str,
        quantity: i64,
        now_ms: i64,
    ) -> StoreResult<CartItem>;
    /// Set the quantity; 0 removes the row and returns `None`
    async fn set_cart_quantity(
        &self,
        user_id: &str,
        food_item_id: &str,
        quantity: i64,
    ) -> StoreResult<Option<CartItem>>;
    async fn remove_cart_item(&self, user_id: &str, food_item_id: &str) -> StoreResult<bool>;
    async fn clear_cart(&self, user_id: &str) -> StoreResult<u64>;
    async fn cart_items(&self, user_id: &str) -> StoreResult<Vec<CartItem>>;
    /// Cart joined with food-item and restaurant details
    async fn cart_lines(&self, user_id: &str) -> StoreResult<Vec<CartLine>>;

    // ========== Orders ==========

    /// Persist a new order with its line items and the initial tracking row
    async fn create_order(
        &self,
        order: Order,
        items: Vec<OrderItem>,
        tracking: OrderTracking,
    ) -> StoreResult<Order>;
    async fn find_order(&self, id: &str) -> StoreResult<Option<Order>>;
    /// Order joined with items, restaurant and tracking timeline
    async fn order_detail(&self, id: &str) -> StoreResult<Option<OrderDetail>>;
    /// Caller's orders, newest first, each fully joined
    async fn list_orders_for_user(&self, user_id: &str) -> StoreResult<Vec<OrderDetail>>;
    /// All orders, newest first (admin)
    async fn list_all_orders(&self) -> StoreResult<Vec<Order>>;
    /// Orders whose status is not terminal (progressor scan set)
    async fn list_active_orders(&self) -> StoreResult<Vec<Order>>;
    /// Compare-and-swap status transition: the write only happens if the
    /// order's status still equals `from`. On success appends exactly one
    /// tracking row carrying `message` and returns `true`; a lost race
    /// returns `Ok(false)` with zero writes.
    async fn transition_order_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        message: &str,
        now_ms: i64,
    ) -> StoreResult<bool>;
    /// Mark the order's payment as paid
    async fn set_payment_paid(&self, order_id: &str, now_ms: i64) -> StoreResult<()>;
    async fn tracking_for_order(&self, order_id: &str) -> StoreResult<Vec<OrderTracking>>;

    // ========== Admin ==========

    async fn analytics(&self) -> StoreResult<AdminAnalytics>;
}
