//! Cart Model

use serde::{Deserialize, Serialize};

use super::food_item::FoodItem;
use super::restaurant::Restaurant;

/// Pending selection — one `(user, food_item)` pair with a quantity
///
/// The pair is unique per user: adding an already-present item increments
/// the quantity instead of inserting a second row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItem {
    pub id: String,
    pub user_id: String,
    pub food_item_id: String,
    pub quantity: i64,
    pub created_at: i64,
}

/// Cart row joined with menu details
///
/// The nested entities are optional on purpose: a cart row can outlive the
/// food item it references, and the client renders an "unknown item"
/// placeholder instead of crashing on the gap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub item: CartItem,
    pub food_item: Option<FoodItem>,
    pub restaurant: Option<Restaurant>,
}

/// Add-to-cart payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartAdd {
    pub food_item_id: String,
    pub quantity: i64,
}

/// Set-quantity payload (quantity 0 removes the row)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSetQuantity {
    pub quantity: i64,
}
