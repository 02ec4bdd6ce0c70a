//! Order Model
//!
//! 订单、订单行、订单跟踪时间线与状态枚举。
//! 金额拆分 (subtotal / delivery_fee / tax / total) 在结账时计算一次，
//! 之后不再重算。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::restaurant::Restaurant;

/// Order lifecycle status
///
/// `pending → confirmed → preparing → out_for_delivery → delivered`,
/// with `cancelled` as a separate terminal state reachable only by
/// explicit action — the timer never cancels an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Wire representation, matches the serde rename
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal states never transition again
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "out_for_delivery" => Ok(OrderStatus::OutForDelivery),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("Unknown order status: {}", other)),
        }
    }
}

/// Payment state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            other => Err(format!("Unknown payment status: {}", other)),
        }
    }
}

/// A placed purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub restaurant_id: String,
    /// Human-facing unique order number, e.g. "ORD-1722..."
    pub order_number: String,
    pub status: OrderStatus,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax: f64,
    /// Always equals subtotal + delivery_fee + tax (computed at checkout)
    pub total: f64,
    pub delivery_address: String,
    pub phone: String,
    /// "cod", "card", ... — opaque to the server
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Line item of an order — price and name are snapshots taken at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub food_item_id: String,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

/// Append-only audit/timeline entry, one per status transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTracking {
    pub id: String,
    pub order_id: String,
    pub status: OrderStatus,
    pub message: String,
    pub created_at: i64,
}

/// Order joined with its items, restaurant and tracking timeline
///
/// The restaurant is optional by the same defensive-decoding rule as
/// [`super::cart::CartLine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub restaurant: Option<Restaurant>,
    pub tracking: Vec<OrderTracking>,
}

// =============================================================================
// Request payloads
// =============================================================================

/// Checkout payload: the order header plus the cart lines being purchased
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub order: CheckoutOrder,
    pub items: Vec<CheckoutItem>,
}

/// Order header supplied by the client at checkout
///
/// Monetary fields are intentionally absent: the server snapshots prices
/// from the menu and computes the breakdown itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutOrder {
    pub restaurant_id: String,
    pub delivery_address: String,
    pub phone: String,
    pub payment_method: String,
}

/// One purchased line at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub food_item_id: String,
    pub quantity: i64,
}

/// Manual status transition payload (admin route)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for s in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(s.as_str().parse::<OrderStatus>().unwrap(), s);
        }
    }

    #[test]
    fn only_delivered_and_cancelled_are_terminal() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::OutForDelivery.is_terminal());
    }
}
