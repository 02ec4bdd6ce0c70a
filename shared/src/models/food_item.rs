//! Food Item Model

use serde::{Deserialize, Serialize};

/// Purchasable menu entry, belongs to one restaurant and one category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct FoodItem {
    pub id: String,
    pub restaurant_id: String,
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub is_available: bool,
    /// Vegetarian dietary flag
    pub is_veg: bool,
    pub image_url: Option<String>,
    pub created_at: i64,
}

/// Create food item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItemCreate {
    pub restaurant_id: String,
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub is_available: Option<bool>,
    pub is_veg: Option<bool>,
    pub image_url: Option<String>,
}

/// Update food item payload (price / availability edits)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub is_available: Option<bool>,
    pub is_veg: Option<bool>,
    pub image_url: Option<String>,
    pub category_id: Option<String>,
}
