//! SurrealDB store adapter
//!
//! 嵌入式 SurrealDB (RocksDB) 实现 [`Store`]。文档模型，无 schema 迁移；
//! 表结构与 shared 模型一致，外键存纯字符串 key。

pub mod records;

use async_trait::async_trait;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use shared::models::{
    CartItem, CartLine, Category, FoodItem, Order, OrderDetail, OrderItem, OrderStatus,
    OrderTracking, Restaurant, RestaurantDetail, User,
};

use crate::db::store::{AdminAnalytics, Store, StoreError, StoreResult};
use records::{
    CartItemRecord, CategoryRecord, FoodItemRecord, OrderItemRecord, OrderRecord,
    OrderTrackingRecord, RestaurantRecord, UserRecord,
};

const USER: &str = "user";
const RESTAURANT: &str = "restaurant";
const CATEGORY: &str = "category";
const FOOD_ITEM: &str = "food_item";
const CART_ITEM: &str = "cart_item";
const ORDER: &str = "order";
const ORDER_ITEM: &str = "order_item";
const ORDER_TRACKING: &str = "order_tracking";

/// Terminal statuses, excluded from the progressor scan set
const TERMINAL: [&str; 2] = ["delivered", "cancelled"];

/// Embedded SurrealDB adapter
#[derive(Clone)]
pub struct SurrealStore {
    db: Surreal<Db>,
}

#[derive(Debug, serde::Deserialize)]
struct CountRow {
    count: i64,
}

#[derive(Debug, serde::Deserialize)]
struct RevenueRow {
    revenue: Option<f64>,
}

impl SurrealStore {
    /// Open (or create) the database at `path`
    pub async fn open(path: &str) -> StoreResult<Self> {
        let db = Surreal::new::<RocksDb>(path).await?;
        db.use_ns("bento").use_db("storefront").await?;
        Ok(Self { db })
    }

    /// Access the raw handle (tests and maintenance tooling)
    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    async fn count_table(&self, table: &str) -> StoreResult<i64> {
        let mut result = self
            .db
            .query(format!("SELECT count() AS count FROM {table} GROUP ALL"))
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.into_iter().next().map(|r| r.count).unwrap_or(0))
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

    async fn items_for_order(&self, order_id: &str) -> StoreResult<Vec<OrderItem>> {
        let mut result = self
            .db
            .query("SELECT * FROM order_item WHERE order_id = $oid")
            .bind(("oid", order_id.to_string()))
            .await?;
        let rows: Vec<OrderItemRecord> = result.take(0)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl Store for SurrealStore {
    // ========== Users ==========

    async fn create_user(&self, user: User) -> StoreResult<User> {
        if self.find_user_by_email(&user.email).await?.is_some() {
            return Err(StoreError::Duplicate(format!(
                "User '{}' already exists",
                user.email
            )));
        }
        let record = UserRecord::from(&user);
        let created: Option<UserRecord> = self
            .db
            .create((USER, user.id.as_str()))
            .content(record)
            .await?;
        created
            .map(Into::into)
            .ok_or_else(|| StoreError::Database("Failed to create user".to_string()))
    }

    async fn find_user_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        let record: Option<UserRecord> = self.db.select((USER, id)).await?;
        Ok(record.map(Into::into))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let mut result = self
            .db
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?;
        let rows: Vec<UserRecord> = result.take(0)?;
        Ok(rows.into_iter().next().map(Into::into))
    }

    async fn update_user(&self, user: &User) -> StoreResult<User> {
        let record = UserRecord::from(user);
        let updated: Option<UserRecord> = self
            .db
            .update((USER, user.id.as_str()))
            .content(record)
            .await?;
        updated
            .map(Into::into)
            .ok_or_else(|| StoreError::NotFound(format!("User {} not found", user.id)))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let mut result = self
            .db
            .query("SELECT * FROM user ORDER BY created_at DESC")
            .await?;
        let rows: Vec<UserRecord> = result.take(0)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    // ========== Restaurants ==========

    async fn create_restaurant(&self, restaurant: Restaurant) -> StoreResult<Restaurant> {
        let record = RestaurantRecord::from(&restaurant);
        let created: Option<RestaurantRecord> = self
            .db
            .create((RESTAURANT, restaurant.id.as_str()))
            .content(record)
            .await?;
        created
            .map(Into::into)
            .ok_or_else(|| StoreError::Database("Failed to create restaurant".to_string()))
    }

    async fn update_restaurant(&self, restaurant: &Restaurant) -> StoreResult<Restaurant> {
        let record = RestaurantRecord::from(restaurant);
        let updated: Option<RestaurantRecord> = self
            .db
            .update((RESTAURANT, restaurant.id.as_str()))
            .content(record)
            .await?;
        updated
            .map(Into::into)
            .ok_or_else(|| StoreError::NotFound(format!("Restaurant {} not found", restaurant.id)))
    }

    async fn find_restaurant(&self, id: &str) -> StoreResult<Option<Restaurant>> {
        let record: Option<RestaurantRecord> = self.db.select((RESTAURANT, id)).await?;
        Ok(record.map(Into::into))
    }

    async fn list_open_restaurants(&self) -> StoreResult<Vec<Restaurant>> {
        let mut result = self
            .db
            .query("SELECT * FROM restaurant WHERE is_open = true ORDER BY rating DESC")
            .await?;
        let rows: Vec<RestaurantRecord> = result.take(0)?;
        Ok(rows.into_iter().map(Into::into).collect())
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
        let mut result = self
            .db
            .query("SELECT * FROM category WHERE name = $name LIMIT 1")
            .bind(("name", category.name.clone()))
            .await?;
        let existing: Vec<CategoryRecord> = result.take(0)?;
        if !existing.is_empty() {
            return Err(StoreError::Duplicate(format!(
                "Category '{}' already exists",
                category.name
            )));
        }

        let record = CategoryRecord::from(&category);
        let created: Option<CategoryRecord> = self
            .db
            .create((CATEGORY, category.id.as_str()))
            .content(record)
            .await?;
        created
            .map(Into::into)
            .ok_or_else(|| StoreError::Database("Failed to create category".to_string()))
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let mut result = self.db.query("SELECT * FROM category ORDER BY name").await?;
        let rows: Vec<CategoryRecord> = result.take(0)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    // ========== Food items ==========

    async fn create_food_item(&self, item: FoodItem) -> StoreResult<FoodItem> {
        let record = FoodItemRecord::from(&item);
        let created: Option<FoodItemRecord> = self
            .db
            .create((FOOD_ITEM, item.id.as_str()))
            .content(record)
            .await?;
        created
            .map(Into::into)
            .ok_or_else(|| StoreError::Database("Failed to create food item".to_string()))
    }

    async fn update_food_item(&self, item: &FoodItem) -> StoreResult<FoodItem> {
        let record = FoodItemRecord::from(item);
        let updated: Option<FoodItemRecord> = self
            .db
            .update((FOOD_ITEM, item.id.as_str()))
            .content(record)
            .await?;
        updated
            .map(Into::into)
            .ok_or_else(|| StoreError::NotFound(format!("Food item {} not found", item.id)))
    }

    async fn find_food_item(&self, id: &str) -> StoreResult<Option<FoodItem>> {
        let record: Option<FoodItemRecord> = self.db.select((FOOD_ITEM, id)).await?;
        Ok(record.map(Into::into))
    }

    async fn list_food_items(
        &self,
        restaurant_id: Option<&str>,
        category_id: Option<&str>,
    ) -> StoreResult<Vec<FoodItem>> {
        let mut sql = String::from("SELECT * FROM food_item");
        let mut clauses = Vec::new();
        if restaurant_id.is_some() {
            clauses.push("restaurant_id = $rid");
        }
        if category_id.is_some() {
            clauses.push("category_id = $cid");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY name");

        let mut query = self.db.query(sql);
        if let Some(rid) = restaurant_id {
            query = query.bind(("rid", rid.to_string()));
        }
        if let Some(cid) = category_id {
            query = query.bind(("cid", cid.to_string()));
        }
        let mut result = query.await?;
        let rows: Vec<FoodItemRecord> = result.take(0)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    // ========== Cart ==========

    async fn add_to_cart(
        &self,
        user_id: &str,
        food_item_id: &str,
        quantity: i64,
        now_ms: i64,
    ) -> StoreResult<CartItem> {
        // Increment in place if the (user, food_item) pair already exists
        let mut result = self
            .db
            .query(
                "UPDATE cart_item SET quantity += $q \
                 WHERE user_id = $uid AND food_item_id = $fid RETURN AFTER",
            )
            .bind(("q", quantity))
            .bind(("uid", user_id.to_string()))
            .bind(("fid", food_item_id.to_string()))
            .await?;
        let updated: Vec<CartItemRecord> = result.take(0)?;
        if let Some(row) = updated.into_iter().next() {
            return Ok(row.into());
        }

        let item = CartItem {
            id: crate::utils::ids::new_id(),
            user_id: user_id.to_string(),
            food_item_id: food_item_id.to_string(),
            quantity,
            created_at: now_ms,
        };
        let record = CartItemRecord::from(&item);
        let created: Option<CartItemRecord> = self
            .db
            .create((CART_ITEM, item.id.as_str()))
            .content(record)
            .await?;
        created
            .map(Into::into)
            .ok_or_else(|| StoreError::Database("Failed to create cart item".to_string()))
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
        let mut result = self
            .db
            .query(
                "UPDATE cart_item SET quantity = $q \
                 WHERE user_id = $uid AND food_item_id = $fid RETURN AFTER",
            )
            .bind(("q", quantity))
            .bind(("uid", user_id.to_string()))
            .bind(("fid", food_item_id.to_string()))
            .await?;
        let updated: Vec<CartItemRecord> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .map(|r| Some(r.into()))
            .ok_or_else(|| StoreError::NotFound(format!("Cart item {food_item_id} not found")))
    }

    async fn remove_cart_item(&self, user_id: &str, food_item_id: &str) -> StoreResult<bool> {
        let mut result = self
            .db
            .query(
                "DELETE cart_item WHERE user_id = $uid AND food_item_id = $fid RETURN BEFORE",
            )
            .bind(("uid", user_id.to_string()))
            .bind(("fid", food_item_id.to_string()))
            .await?;
        let removed: Vec<CartItemRecord> = result.take(0)?;
        Ok(!removed.is_empty())
    }

    async fn clear_cart(&self, user_id: &str) -> StoreResult<u64> {
        let mut result = self
            .db
            .query("DELETE cart_item WHERE user_id = $uid RETURN BEFORE")
            .bind(("uid", user_id.to_string()))
            .await?;
        let removed: Vec<CartItemRecord> = result.take(0)?;
        Ok(removed.len() as u64)
    }

    async fn cart_items(&self, user_id: &str) -> StoreResult<Vec<CartItem>> {
        let mut result = self
            .db
            .query("SELECT * FROM cart_item WHERE user_id = $uid ORDER BY created_at")
            .bind(("uid", user_id.to_string()))
            .await?;
        let rows: Vec<CartItemRecord> = result.take(0)?;
        Ok(rows.into_iter().map(Into::into).collect())
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
        let record = OrderRecord::from(&order);
        let created: Option<OrderRecord> = self
            .db
            .create((ORDER, order.id.as_str()))
            .content(record)
            .await?;
        let created =
            created.ok_or_else(|| StoreError::Database("Failed to create order".to_string()))?;

        for item in &items {
            let item_record = OrderItemRecord::from(item);
            let _: Option<OrderItemRecord> = self
                .db
                .create((ORDER_ITEM, item.id.as_str()))
                .content(item_record)
                .await?;
        }

        let tracking_record = OrderTrackingRecord::from(&tracking);
        let _: Option<OrderTrackingRecord> = self
            .db
            .create((ORDER_TRACKING, tracking.id.as_str()))
            .content(tracking_record)
            .await?;

        Ok(created.into())
    }

    async fn find_order(&self, id: &str) -> StoreResult<Option<Order>> {
        let record: Option<OrderRecord> = self.db.select((ORDER, id)).await?;
        Ok(record.map(Into::into))
    }

    async fn order_detail(&self, id: &str) -> StoreResult<Option<OrderDetail>> {
        let Some(order) = self.find_order(id).await? else {
            return Ok(None);
        };
        Ok(Some(self.assemble_detail(order).await?))
    }

    async fn list_orders_for_user(&self, user_id: &str) -> StoreResult<Vec<OrderDetail>> {
        let mut result = self
            .db
            .query("SELECT * FROM order WHERE user_id = $uid ORDER BY created_at DESC")
            .bind(("uid", user_id.to_string()))
            .await?;
        let rows: Vec<OrderRecord> = result.take(0)?;
        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            details.push(self.assemble_detail(row.into()).await?);
        }
        Ok(details)
    }

    async fn list_all_orders(&self) -> StoreResult<Vec<Order>> {
        let mut result = self
            .db
            .query("SELECT * FROM order ORDER BY created_at DESC")
            .await?;
        let rows: Vec<OrderRecord> = result.take(0)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_active_orders(&self) -> StoreResult<Vec<Order>> {
        let mut result = self
            .db
            .query("SELECT * FROM order WHERE status NOT INSIDE $terminal ORDER BY created_at")
            .bind(("terminal", TERMINAL.map(String::from).to_vec()))
            .await?;
        let rows: Vec<OrderRecord> = result.take(0)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn transition_order_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        message: &str,
        now_ms: i64,
    ) -> StoreResult<bool> {
        // Conditional update: only one of two racing writers can match `from`
        let mut result = self
            .db
            .query(
                "UPDATE type::thing('order', $id) SET status = $to, updated_at = $now \
                 WHERE status = $from RETURN AFTER",
            )
            .bind(("id", order_id.to_string()))
            .bind(("to", to.as_str().to_string()))
            .bind(("from", from.as_str().to_string()))
            .bind(("now", now_ms))
            .await?;
        let updated: Vec<OrderRecord> = result.take(0)?;
        if updated.is_empty() {
            return Ok(false);
        }

        let tracking = OrderTracking {
            id: crate::utils::ids::new_id(),
            order_id: order_id.to_string(),
            status: to,
            message: message.to_string(),
            created_at: now_ms,
        };
        let record = OrderTrackingRecord::from(&tracking);
        let _: Option<OrderTrackingRecord> = self
            .db
            .create((ORDER_TRACKING, tracking.id.as_str()))
            .content(record)
            .await?;
        Ok(true)
    }

    async fn set_payment_paid(&self, order_id: &str, now_ms: i64) -> StoreResult<()> {
        let mut result = self
            .db
            .query(
                "UPDATE type::thing('order', $id) SET payment_status = 'paid', updated_at = $now \
                 RETURN AFTER",
            )
            .bind(("id", order_id.to_string()))
            .bind(("now", now_ms))
            .await?;
        let updated: Vec<OrderRecord> = result.take(0)?;
        if updated.is_empty() {
            return Err(StoreError::NotFound(format!("Order {order_id} not found")));
        }
        Ok(())
    }

    async fn tracking_for_order(&self, order_id: &str) -> StoreResult<Vec<OrderTracking>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM order_tracking WHERE order_id = $oid ORDER BY created_at",
            )
            .bind(("oid", order_id.to_string()))
            .await?;
        let rows: Vec<OrderTrackingRecord> = result.take(0)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    // ========== Admin ==========

    async fn analytics(&self) -> StoreResult<AdminAnalytics> {
        let users = self.count_table(USER).await?;
        let restaurants = self.count_table(RESTAURANT).await?;
        let orders = self.count_table(ORDER).await?;

        let mut result = self
            .db
            .query(
                "SELECT count() AS count FROM order WHERE status NOT INSIDE $terminal GROUP ALL",
            )
            .bind(("terminal", TERMINAL.map(String::from).to_vec()))
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        let active_orders = rows.into_iter().next().map(|r| r.count).unwrap_or(0);

        let mut result = self
            .db
            .query("SELECT count() AS count FROM order WHERE status = 'delivered' GROUP ALL")
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        let delivered_orders = rows.into_iter().next().map(|r| r.count).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT math::sum(total) AS revenue FROM order \
                 WHERE status != 'cancelled' GROUP ALL",
            )
            .await?;
        let rows: Vec<RevenueRow> = result.take(0)?;
        let revenue = rows
            .into_iter()
            .next()
            .and_then(|r| r.revenue)
            .unwrap_or(0.0);

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
