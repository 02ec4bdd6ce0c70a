//! Restaurant Model

use serde::{Deserialize, Serialize};

use super::food_item::FoodItem;

/// Restaurant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    /// Cuisine tag, e.g. "indian", "pizza"
    pub cuisine: String,
    pub rating: f64,
    pub delivery_fee: f64,
    /// Estimated delivery time in minutes
    pub delivery_time_minutes: i64,
    pub is_open: bool,
    pub address: String,
    pub image_url: Option<String>,
    pub created_at: i64,
}

/// Restaurant with its menu, assembled by the persistence adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantDetail {
    pub restaurant: Restaurant,
    pub food_items: Vec<FoodItem>,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub cuisine: String,
    pub rating: Option<f64>,
    pub delivery_fee: f64,
    pub delivery_time_minutes: Option<i64>,
    pub is_open: Option<bool>,
    pub address: String,
    pub image_url: Option<String>,
}

/// Update restaurant payload (all fields optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub cuisine: Option<String>,
    pub rating: Option<f64>,
    pub delivery_fee: Option<f64>,
    pub delivery_time_minutes: Option<i64>,
    pub is_open: Option<bool>,
    pub address: Option<String>,
    pub image_url: Option<String>,
}
