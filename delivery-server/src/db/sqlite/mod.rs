//! SQLite store adapter
//!
//! 关系后端：sqlx + SQLite (WAL)。schema 见 `migrations/`，与文档后端
//! 一一对应。状态列存字符串，读取时解析回枚举。

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use shared::models::{
    CartItem, CartLine, Category, FoodItem, Order, OrderDetail, OrderItem, OrderStatus,
    OrderTracking, PaymentStatus, Restaurant, RestaurantDetail, User,
};

use crate::db::store::{AdminAnalytics, Store, StoreError, StoreResult};

/// SQLite adapter — owns a connection pool
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

/// Order row with raw status columns (parsed into enums on conversion)
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    user_id: String,
    restaurant_id: String,
    order_number: String,
    status: String,
    subtotal: f64,
    delivery_fee: f64,
    tax: f64,
    total: f64,
    delivery_address: String,
    phone: String,
    payment_method: String,
    payment_status: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(r: OrderRow) -> Result<Self, Self::Error> {
        let status = OrderStatus::from_str(&r.status).map_err(StoreError::Database)?;
        let payment_status =
            PaymentStatus::from_str(&r.payment_status).map_err(StoreError::Database)?;
        Ok(Order {
            id: r.id,
            user_id: r.user_id,
            restaurant_id: r.restaurant_id,
            order_number: r.order_number,
            status,
            subtotal: r.subtotal,
            delivery_fee: r.delivery_fee,
            tax: r.tax,
            total: r.total,
            delivery_address: r.delivery_address,
            phone: r.phone,
            payment_method: r.payment_method,
            payment_status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TrackingRow {
    id: String,
    order_id: String,
    status: String,
    message: String,
    created_at: i64,
}

impl TryFrom<TrackingRow> for OrderTracking {
    type Error = StoreError;

    fn try_from(r: TrackingRow) -> Result<Self, Self::Error> {
        let status = OrderStatus::from_str(&r.status).map_err(StoreError::Database)?;
        Ok(OrderTracking {
            id: r.id,
            order_id: r.order_id,
            status,
            message: r.message,
            created_at: r.created_at,
        })
    }
}

impl SqliteStore {
    /// Open (or create) the database file with WAL mode and run migrations
    pub async fn open(db_path: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| StoreError::Database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to open database: {e}")))?;

        // busy_timeout: 写冲突时等待 5s 而非立即失败
        sqlx::query("PRAGMA busy_timeout = 5000;")
            .execute(&pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to set busy_timeout: {e}")))?;

        Self::with_pool(pool).await
    }

    /// In-memory database (tests) — one connection so state is shared
    pub async fn memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StoreError::Database(e.to_string()))?
            .pragma("foreign_keys", "ON");
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to open database: {e}")))?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> StoreResult<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to apply migrations: {e}")))?;
        Ok(Self { pool })
    }

    async fn items_for_order(&self, order_id: &str) -> StoreResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = ?1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Fan-out join: order -> items + restaurant + tracking
    async fn assemble_detail(&self, order: Order) -> StoreResult<OrderDetail> {
        let items = self.items_for_order(&order.id).await?;
        let restaurant = self.find_restaurant(&order.restaurant_id).await?;
        let tracking = self.tracking_for_order(&order.id).await?;
        Ok(OrderDetail {
            order,
            items,
            restaurant,
            tracking,
        })
    }
}

#[async_trait]
impl Store for SqliteStore {
    // ========== Users ==========

    async fn create_user(&self, user: User) -> StoreResult<User> {
        if self.find_user_by_email(&user.email).await?.is_some() {
            return Err(StoreError::Duplicate(format!(
                "User '{}' already exists",
                user.email
            )));
        }
        sqlx::query(
            "INSERT INTO users (id, name, email, phone, password_hash, verified, otp_code, \
             otp_expires_at, is_active, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.verified)
        .bind(&user.otp_code)
        .bind(user.otp_expires_at)
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_user(&self, user: &User) -> StoreResult<User> {
        let result = sqlx::query(
            "UPDATE users SET name = ?2, email = ?3, phone = ?4, password_hash = ?5, \
             verified = ?6, otp_code = ?7, otp_expires_at = ?8, is_active = ?9 WHERE id = ?1",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.verified)
        .bind(&user.otp_code)
        .bind(user.otp_expires_at)
        .bind(user.is_active)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("User {} not found", user.id)));
        }
        Ok(user.clone())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    // ========== Restaurants ==========

    async fn create_restaurant(&self, restaurant: Restaurant) -> StoreResult<Restaurant> {
        sqlx::query(
            "INSERT INTO restaurants (id, name, cuisine, rating, delivery_fee, \
             delivery_time_minutes, is_open, address, image_url, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&restaurant.id)
        .bind(&restaurant.name)
        .bind(&restaurant.cuisine)
        .bind(restaurant.rating)
        .bind(restaurant.delivery_fee)
        .bind(restaurant.delivery_time_minutes)
        .bind(restaurant.is_open)
        .bind(&restaurant.address)
        .bind(&restaurant.image_url)
        .bind(restaurant.created_at)
        .execute(&self.pool)
        .await?;
        Ok(restaurant)
    }

    async fn update_restaurant(&self, restaurant: &Restaurant) -> StoreResult<Restaurant> {
        let result = sqlx::query(
            "UPDATE restaurants SET name = ?2, cuisine = ?3, rating = ?4, delivery_fee = ?5, \
             delivery_time_minutes = ?6, is_open = ?7, address = ?8, image_url = ?9 WHERE id = ?1",
        )
        .bind(&restaurant.id)
        .bind(&restaurant.name)
        .bind(&restaurant.cuisine)
        .bind(restaurant.rating)
        .bind(restaurant.delivery_fee)
        .bind(restaurant.delivery_time_minutes)
        .bind(restaurant.is_open)
        .bind(&restaurant.address)
        .bind(&restaurant.image_url)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!(
                "Restaurant {} not found",
                restaurant.id
            )));
        }
        Ok(restaurant.clone())
    }

    async fn find_restaurant(&self, id: &str) -> StoreResult<Option<Restaurant>> {
        let restaurant = sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(restaurant)
    }

    async fn list_open_restaurants(&self) -> StoreResult<Vec<Restaurant>> {
        let restaurants = sqlx::query_as::<_, Restaurant>(
            "SELECT * FROM restaurants WHERE is_open = 1 ORDER BY rating DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(restaurants)
    }

    async fn restaurant_detail(&self, id: &str) -> StoreResult<Option<RestaurantDetail>> {
        let Some(restaurant) = self.find_restaurant(id).await? else {
            return Ok(None);
        };
        let food_items = self.list_food_items(Some(id), None).await?;
        Ok(Some(RestaurantDetail {
            restaurant,
            food_items,
        }))
    }

    // ========== Categories ==========

    async fn create_category(&self, category: Category) -> StoreResult<Category> {
        let result = sqlx::query("INSERT INTO categories (id, name, image_url) VALUES (?1, ?2, ?3)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.image_url)
            .execute(&self.pool)
            .await;
        match result {
            Ok(_) => Ok(category),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(StoreError::Duplicate(
                format!("Category '{}' already exists", category.name),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    // ========== Food items ==========

    async fn create_food_item(&self, item: FoodItem) -> StoreResult<FoodItem> {
        sqlx::query(
            "INSERT INTO food_items (id, restaurant_id, category_id, name, description, price, \
             is_available, is_veg, image_url, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&item.id)
        .bind(&item.restaurant_id)
        .bind(&item.category_id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.is_available)
        .bind(item.is_veg)
        .bind(&item.image_url)
        .bind(item.created_at)
        .execute(&self.pool)
        .await?;
        Ok(item)
    }

    async fn update_food_item(&self, item: &FoodItem) -> StoreResult<FoodItem> {
        let result = sqlx::query(
            "UPDATE food_items SET restaurant_id = ?2, category_id = ?3, name = ?4, \
             description = ?5, price = ?6, is_available = ?7, is_veg = ?8, image_url = ?9 \
             WHERE id = ?1",
        )
        .bind(&item.id)
        .bind(&item.restaurant_id)
        .bind(&item.category_id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.is_available)
        .bind(item.is_veg)
        .bind(&item.image_url)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!(
                "Food item {} not found",
                item.id
            )));
        }
        Ok(item.clone())
    }

    async fn find_food_item(&self, id: &str) -> StoreResult<Option<FoodItem>> {
        let item = sqlx::query_as::<_, FoodItem>("SELECT * FROM food_items WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    async fn list_food_items(
        &self,
        restaurant_id: Option<&str>,
        category_id: Option<&str>,
    ) -> StoreResult<Vec<FoodItem>> {
        // NULL-guarded filters keep this a single statement for all four
        // combinations of query params
        let items = sqlx::query_as::<_, FoodItem>(
            "SELECT * FROM food_items \
             WHERE (?1 IS NULL OR restaurant_id = ?1) AND (?2 IS NULL OR category_id = ?2) \
             ORDER BY name",
        )
        .bind(restaurant_id)
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    // ========== Cart ==========

    async fn add_to_cart(
        &self,
        user_id: &str,
        food_item_id: &str,
        quantity: i64,
        now_ms: i64,
    ) -> StoreResult<CartItem> {
        // UNIQUE(user_id, food_item_id) + upsert keeps the pair to one row
        let item = sqlx::query_as::<_, CartItem>(
            "INSERT INTO cart_items (id, user_id, food_item_id, quantity, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT(user_id, food_item_id) \
             DO UPDATE SET quantity = quantity + excluded.quantity \
             RETURNING *",
        )
        .bind(crate::utils::ids::new_id())
        .bind(user_id)
        .bind(food_item_id)
        .bind(quantity)
        .bind(now_ms)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    async fn set_cart_quantity(
        &self,
        user_id: &str,
        food_item_id: &str,
        quantity: i64,
    ) -> StoreResult<Option<CartItem>> {
        if quantity <= 0 {
            self.remove_cart_item(user_id, food_item_id).await?;
            return Ok(None);
        }
        let item = sqlx::query_as::<_, CartItem>(
            "UPDATE cart_items SET quantity = ?3 \
             WHERE user_id = ?1 AND food_item_id = ?2 RETURNING *",
        )
        .bind(user_id)
        .bind(food_item_id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;
        item.map(Some)
            .ok_or_else(|| StoreError::NotFound(format!("Cart item {food_item_id} not found")))
    }

    async fn remove_cart_item(&self, user_id: &str, food_item_id: &str) -> StoreResult<bool> {
        let result =
            sqlx::query("DELETE FROM cart_items WHERE user_id = ?1 AND food_item_id = ?2")
                .bind(user_id)
                .bind(food_item_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_cart(&self, user_id: &str) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn cart_items(&self, user_id: &str) -> StoreResult<Vec<CartItem>> {
        let items = sqlx::query_as::<_, CartItem>(
            "SELECT * FROM cart_items WHERE user_id = ?1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn cart_lines(&self, user_id: &str) -> StoreResult<Vec<CartLine>> {
        let items = self.cart_items(user_id).await?;
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            // Deleted menu entries leave the line with an absent food_item
            let food_item = self.find_food_item(&item.food_item_id).await?;
            let restaurant = match &food_item {
                Some(f) => self.find_restaurant(&f.restaurant_id).await?,
                None => None,
            };
            lines.push(CartLine {
                item,
                food_item,
                restaurant,
            });
        }
        Ok(lines)
    }

    // ========== Orders ==========

    async fn create_order(
        &self,
        order: Order,
        items: Vec<OrderItem>,
        tracking: OrderTracking,
    ) -> StoreResult<Order> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO orders (id, user_id, restaurant_id, order_number, status, subtotal, \
             delivery_fee, tax, total, delivery_address, phone, payment_method, payment_status, \
             created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(&order.restaurant_id)
        .bind(&order.order_number)
        .bind(order.status.as_str())
        .bind(order.subtotal)
        .bind(order.delivery_fee)
        .bind(order.tax)
        .bind(order.total)
        .bind(&order.delivery_address)
        .bind(&order.phone)
        .bind(&order.payment_method)
        .bind(order.payment_status.as_str())
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in &items {
            sqlx::query(
                "INSERT INTO order_items (id, order_id, food_item_id, name, quantity, price) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.food_item_id)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "INSERT INTO order_tracking (id, order_id, status, message, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&tracking.id)
        .bind(&tracking.order_id)
        .bind(tracking.status.as_str())
        .bind(&tracking.message)
        .bind(tracking.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(order)
    }

    async fn find_order(&self, id: &str) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Order::try_from).transpose()
    }

    async fn order_detail(&self, id: &str) -> StoreResult<Option<OrderDetail>> {
        let Some(order) = self.find_order(id).await? else {
            return Ok(None);
        };
        Ok(Some(self.assemble_detail(order).await?))
    }

    async fn list_orders_for_user(&self, user_id: &str) -> StoreResult<Vec<OrderDetail>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT * FROM orders WHERE user_id = ?1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            details.push(self.assemble_detail(Order::try_from(row)?).await?);
        }
        Ok(details)
    }

    async fn list_all_orders(&self) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Order::try_from).collect()
    }

    async fn list_active_orders(&self) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT * FROM orders WHERE status NOT IN ('delivered', 'cancelled') \
             ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Order::try_from).collect()
    }

    async fn transition_order_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        message: &str,
        now_ms: i64,
    ) -> StoreResult<bool> {
        // Status write and tracking append commit together; the WHERE on
        // the current status is the compare-and-swap
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1 AND status = ?4",
        )
        .bind(order_id)
        .bind(to.as_str())
        .bind(now_ms)
        .bind(from.as_str())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO order_tracking (id, order_id, status, message, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(crate::utils::ids::new_id())
        .bind(order_id)
        .bind(to.as_str())
        .bind(message)
        .bind(now_ms)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn set_payment_paid(&self, order_id: &str, now_ms: i64) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE orders SET payment_status = 'paid', updated_at = ?2 WHERE id = ?1",
        )
        .bind(order_id)
        .bind(now_ms)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Order {order_id} not found")));
        }
        Ok(())
    }

    async fn tracking_for_order(&self, order_id: &str) -> StoreResult<Vec<OrderTracking>> {
        let rows = sqlx::query_as::<_, TrackingRow>(
            "SELECT * FROM order_tracking WHERE order_id = ?1 ORDER BY created_at",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(OrderTracking::try_from).collect()
    }

    // ========== Admin ==========

    async fn analytics(&self) -> StoreResult<AdminAnalytics> {
        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        let restaurants: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM restaurants")
            .fetch_one(&self.pool)
            .await?;
        let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        let active_orders: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders WHERE status NOT IN ('delivered', 'cancelled')",
        )
        .fetch_one(&self.pool)
        .await?;
        let delivered_orders: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status = 'delivered'")
                .fetch_one(&self.pool)
                .await?;
        let revenue: f64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total), 0) FROM orders WHERE status != 'cancelled'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(AdminAnalytics {
            users,
            restaurants,
            orders,
            active_orders,
            delivered_orders,
            revenue,
        })
    }
}
