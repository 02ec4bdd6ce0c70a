//! Entity models shared between the server and clients
//!
//! All monetary amounts are `f64` at the serialization boundary (the server
//! computes with `rust_decimal` internally). All timestamps are Unix
//! milliseconds (`i64`).

pub mod cart;
pub mod category;
pub mod food_item;
pub mod order;
pub mod restaurant;
pub mod user;

pub use cart::{CartAdd, CartItem, CartLine, CartSetQuantity};
pub use category::{Category, CategoryCreate};
pub use food_item::{FoodItem, FoodItemCreate, FoodItemUpdate};
pub use order::{
    CheckoutItem, CheckoutOrder, CheckoutRequest, Order, OrderDetail, OrderItem, OrderStatus,
    OrderTracking, PaymentStatus, StatusUpdateRequest,
};
pub use restaurant::{Restaurant, RestaurantCreate, RestaurantDetail, RestaurantUpdate};
pub use user::User;
