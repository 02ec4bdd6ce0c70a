//! Shared types for the Bento delivery platform
//!
//! Common types used by the server and client crates: entity models,
//! request/response DTOs, the API response envelope and error codes.

pub mod client;
pub mod models;
pub mod response;
pub mod types;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::order::OrderStatus;
pub use response::{API_CODE_SUCCESS, ApiResponse};
pub use types::Timestamp;
