//! SurrealDB record types
//!
//! 数据库侧记录结构：与 shared 模型一一对应，区别仅在 `id` 字段使用
//! SurrealDB 的 `RecordId`。外键一律存纯字符串 key，方便与关系后端保持
//! 同一套 ID 语义。

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use shared::models::{
    CartItem, Category, FoodItem, Order, OrderItem, OrderStatus, OrderTracking, PaymentStatus,
    Restaurant, User,
};

/// Extract the plain key of a record id ("user:abc123" -> "abc123")
pub fn key_string(id: &RecordId) -> String {
    let key = id.key().to_string();
    // String keys render escaped when they are not plain identifiers
    key.trim_start_matches('⟨').trim_end_matches('⟩').to_string()
}

fn id_or_empty(id: &Option<RecordId>) -> String {
    id.as_ref().map(|i| key_string(i)).unwrap_or_default()
}

// =============================================================================
// User
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub verified: bool,
    pub otp_code: Option<String>,
    pub otp_expires_at: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        User {
            id: id_or_empty(&r.id),
            name: r.name,
            email: r.email,
            phone: r.phone,
            password_hash: r.password_hash,
            verified: r.verified,
            otp_code: r.otp_code,
            otp_expires_at: r.otp_expires_at,
            is_active: r.is_active,
            created_at: r.created_at,
        }
    }
}

impl From<&User> for UserRecord {
    fn from(u: &User) -> Self {
        UserRecord {
            id: None,
            name: u.name.clone(),
            email: u.email.clone(),
            phone: u.phone.clone(),
            password_hash: u.password_hash.clone(),
            verified: u.verified,
            otp_code: u.otp_code.clone(),
            otp_expires_at: u.otp_expires_at,
            is_active: u.is_active,
            created_at: u.created_at,
        }
    }
}

// =============================================================================
// Restaurant
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub cuisine: String,
    pub rating: f64,
    pub delivery_fee: f64,
    pub delivery_time_minutes: i64,
    pub is_open: bool,
    pub address: String,
    pub image_url: Option<String>,
    pub created_at: i64,
}

impl From<RestaurantRecord> for Restaurant {
    fn from(r: RestaurantRecord) -> Self {
        Restaurant {
            id: id_or_empty(&r.id),
            name: r.name,
            cuisine: r.cuisine,
            rating: r.rating,
            delivery_fee: r.delivery_fee,
            delivery_time_minutes: r.delivery_time_minutes,
            is_open: r.is_open,
            address: r.address,
            image_url: r.image_url,
            created_at: r.created_at,
        }
    }
}

impl From<&Restaurant> for RestaurantRecord {
    fn from(r: &Restaurant) -> Self {
        RestaurantRecord {
            id: None,
            name: r.name.clone(),
            cuisine: r.cuisine.clone(),
            rating: r.rating,
            delivery_fee: r.delivery_fee,
            delivery_time_minutes: r.delivery_time_minutes,
            is_open: r.is_open,
            address: r.address.clone(),
            image_url: r.image_url.clone(),
            created_at: r.created_at,
        }
    }
}

// =============================================================================
// Category
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub image_url: Option<String>,
}

impl From<CategoryRecord> for Category {
    fn from(r: CategoryRecord) -> Self {
        Category {
            id: id_or_empty(&r.id),
            name: r.name,
            image_url: r.image_url,
        }
    }
}

impl From<&Category> for CategoryRecord {
    fn from(c: &Category) -> Self {
        CategoryRecord {
            id: None,
            name: c.name.clone(),
            image_url: c.image_url.clone(),
        }
    }
}

// =============================================================================
// Food Item
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItemRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub restaurant_id: String,
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub is_available: bool,
    pub is_veg: bool,
    pub image_url: Option<String>,
    pub created_at: i64,
}

impl From<FoodItemRecord> for FoodItem {
    fn from(r: FoodItemRecord) -> Self {
        FoodItem {
            id: id_or_empty(&r.id),
            restaurant_id: r.restaurant_id,
            category_id: r.category_id,
            name: r.name,
            description: r.description,
            price: r.price,
            is_available: r.is_available,
            is_veg: r.is_veg,
            image_url: r.image_url,
            created_at: r.created_at,
        }
    }
}

impl From<&FoodItem> for FoodItemRecord {
    fn from(f: &FoodItem) -> Self {
        FoodItemRecord {
            id: None,
            restaurant_id: f.restaurant_id.clone(),
            category_id: f.category_id.clone(),
            name: f.name.clone(),
            description: f.description.clone(),
            price: f.price,
            is_available: f.is_available,
            is_veg: f.is_veg,
            image_url: f.image_url.clone(),
            created_at: f.created_at,
        }
    }
}

// =============================================================================
// Cart Item
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub user_id: String,
    pub food_item_id: String,
    pub quantity: i64,
    pub created_at: i64,
}

impl From<CartItemRecord> for CartItem {
    fn from(r: CartItemRecord) -> Self {
        CartItem {
            id: id_or_empty(&r.id),
            user_id: r.user_id,
            food_item_id: r.food_item_id,
            quantity: r.quantity,
            created_at: r.created_at,
        }
    }
}

impl From<&CartItem> for CartItemRecord {
    fn from(c: &CartItem) -> Self {
        CartItemRecord {
            id: None,
            user_id: c.user_id.clone(),
            food_item_id: c.food_item_id.clone(),
            quantity: c.quantity,
            created_at: c.created_at,
        }
    }
}

// =============================================================================
// Order / Order Item / Order Tracking
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub user_id: String,
    pub restaurant_id: String,
    pub order_number: String,
    pub status: OrderStatus,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax: f64,
    pub total: f64,
    pub delivery_address: String,
    pub phone: String,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<OrderRecord> for Order {
    fn from(r: OrderRecord) -> Self {
        Order {
            id: id_or_empty(&r.id),
            user_id: r.user_id,
            restaurant_id: r.restaurant_id,
            order_number: r.order_number,
            status: r.status,
            subtotal: r.subtotal,
            delivery_fee: r.delivery_fee,
            tax: r.tax,
            total: r.total,
            delivery_address: r.delivery_address,
            phone: r.phone,
            payment_method: r.payment_method,
            payment_status: r.payment_status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<&Order> for OrderRecord {
    fn from(o: &Order) -> Self {
        OrderRecord {
            id: None,
            user_id: o.user_id.clone(),
            restaurant_id: o.restaurant_id.clone(),
            order_number: o.order_number.clone(),
            status: o.status,
            subtotal: o.subtotal,
            delivery_fee: o.delivery_fee,
            tax: o.tax,
            total: o.total,
            delivery_address: o.delivery_address.clone(),
            phone: o.phone.clone(),
            payment_method: o.payment_method.clone(),
            payment_status: o.payment_status,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub order_id: String,
    pub food_item_id: String,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

impl From<OrderItemRecord> for OrderItem {
    fn from(r: OrderItemRecord) -> Self {
        OrderItem {
            id: id_or_empty(&r.id),
            order_id: r.order_id,
            food_item_id: r.food_item_id,
            name: r.name,
            quantity: r.quantity,
            price: r.price,
        }
    }
}

impl From<&OrderItem> for OrderItemRecord {
    fn from(i: &OrderItem) -> Self {
        OrderItemRecord {
            id: None,
            order_id: i.order_id.clone(),
            food_item_id: i.food_item_id.clone(),
            name: i.name.clone(),
            quantity: i.quantity,
            price: i.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTrackingRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub order_id: String,
    pub status: OrderStatus,
    pub message: String,
    pub created_at: i64,
}

impl From<OrderTrackingRecord> for OrderTracking {
    fn from(r: OrderTrackingRecord) -> Self {
        OrderTracking {
            id: id_or_empty(&r.id),
            order_id: r.order_id,
            status: r.status,
            message: r.message,
            created_at: r.created_at,
        }
    }
}

impl From<&OrderTracking> for OrderTrackingRecord {
    fn from(t: &OrderTracking) -> Self {
        OrderTrackingRecord {
            id: None,
            order_id: t.order_id.clone(),
            status: t.status,
            message: t.message.clone(),
            created_at: t.created_at,
        }
    }
}
