//! Shared test fixtures
//!
//! State construction with injectable store backend and a recording mail
//! transport, plus request plumbing for driving the router in-process.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;

use delivery_server::auth::JwtService;
use delivery_server::core::{Config, ServerState};
use delivery_server::db::StoreBackend;
use delivery_server::db::sqlite::SqliteStore;
use delivery_server::db::store::Store;
use delivery_server::db::surreal::SurrealStore;
use delivery_server::notify::{MailTransport, MemoryTransport, NotificationService};
use delivery_server::utils::ids;
use shared::models::{
    Category, FoodItem, Order, OrderItem, OrderStatus, OrderTracking, PaymentStatus, Restaurant,
    User,
};

pub struct TestCtx {
    pub state: ServerState,
    pub mail: Arc<MemoryTransport>,
    _tmp: Option<tempfile::TempDir>,
}

impl TestCtx {
    pub fn store(&self) -> Arc<dyn Store> {
        self.state.store.clone()
    }

    pub fn app(&self) -> Router {
        delivery_server::api::build_app().with_state(self.state.clone())
    }
}

fn build_ctx(
    store: Arc<dyn Store>,
    backend: StoreBackend,
    tmp: Option<tempfile::TempDir>,
) -> TestCtx {
    let config = Config::with_overrides("./target/test-work", 0, backend);
    let mail = Arc::new(MemoryTransport::new());
    let transport: Arc<dyn MailTransport> = mail.clone();
    let state = ServerState::new(
        config.clone(),
        store,
        Arc::new(JwtService::new(config.jwt.clone())),
        NotificationService::new(transport),
    );
    TestCtx {
        state,
        mail,
        _tmp: tmp,
    }
}

/// In-memory SQLite backend
pub async fn sqlite_ctx() -> TestCtx {
    let store = SqliteStore::memory().await.expect("open sqlite memory db");
    build_ctx(Arc::new(store), StoreBackend::Sqlite, None)
}

/// On-disk SurrealDB backend in a temp dir
pub async fn surreal_ctx() -> TestCtx {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let path = tmp.path().join("bento.surreal");
    let store = SurrealStore::open(&path.to_string_lossy())
        .await
        .expect("open surreal db");
    build_ctx(Arc::new(store), StoreBackend::Surreal, Some(tmp))
}

// ========== Request plumbing ==========

pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let request = match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    };

    let response = app.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Login via the API and return the bearer token
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().expect("token in response").to_string()
}

/// Pull the 6-digit code out of an OTP mail body
pub fn extract_otp(body: &str) -> String {
    body.split("code is: ")
        .nth(1)
        .map(|rest| rest.chars().take(6).collect())
        .expect("OTP code in mail body")
}

// ========== Seed data ==========

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub async fn seed_user(store: &Arc<dyn Store>, email: &str, password: &str) -> User {
    let user = User {
        id: ids::new_id(),
        name: "Test User".to_string(),
        email: email.to_string(),
        phone: None,
        password_hash: delivery_server::auth::hash_password(password).expect("hash password"),
        verified: true,
        otp_code: None,
        otp_expires_at: None,
        is_active: true,
        created_at: now_ms(),
    };
    store.create_user(user).await.expect("seed user")
}

pub async fn seed_restaurant(store: &Arc<dyn Store>) -> Restaurant {
    let restaurant = Restaurant {
        id: ids::new_id(),
        name: "Golden Wok".to_string(),
        cuisine: "chinese".to_string(),
        rating: 4.5,
        delivery_fee: 4.99,
        delivery_time_minutes: 35,
        is_open: true,
        address: "12 Noodle Lane".to_string(),
        image_url: None,
        created_at: now_ms(),
    };
    store
        .create_restaurant(restaurant)
        .await
        .expect("seed restaurant")
}

pub async fn seed_category(store: &Arc<dyn Store>, name: &str) -> Category {
    let category = Category {
        id: ids::new_id(),
        name: name.to_string(),
        image_url: None,
    };
    store.create_category(category).await.expect("seed category")
}

pub async fn seed_food_item(
    store: &Arc<dyn Store>,
    restaurant_id: &str,
    category_id: &str,
    name: &str,
    price: f64,
) -> FoodItem {
    let item = FoodItem {
        id: ids::new_id(),
        restaurant_id: restaurant_id.to_string(),
        category_id: category_id.to_string(),
        name: name.to_string(),
        description: None,
        price,
        is_available: true,
        is_veg: false,
        image_url: None,
        created_at: now_ms(),
    };
    store.create_food_item(item).await.expect("seed food item")
}

/// Seed an order (one line item + the initial pending tracking row) with a
/// chosen creation time — progressor tests backdate it.
pub async fn seed_order(
    store: &Arc<dyn Store>,
    user_id: &str,
    restaurant_id: &str,
    created_at: i64,
    status: OrderStatus,
) -> Order {
    let order_id = ids::new_id();
    let order = Order {
        id: order_id.clone(),
        user_id: user_id.to_string(),
        restaurant_id: restaurant_id.to_string(),
        // Key-based suffix keeps seeded numbers collision-free even when
        // several orders share a millisecond
        order_number: format!("ORD-{created_at}-{}", &order_id[..8]),
        status,
        subtotal: 20.0,
        delivery_fee: 4.99,
        tax: 1.0,
        total: 25.99,
        delivery_address: "12 Noodle Lane".to_string(),
        phone: "555-0100".to_string(),
        payment_method: "cod".to_string(),
        payment_status: PaymentStatus::Pending,
        created_at,
        updated_at: created_at,
    };
    let items = vec![OrderItem {
        id: ids::new_id(),
        order_id: order_id.clone(),
        food_item_id: ids::new_id(),
        name: "Fried Rice".to_string(),
        quantity: 2,
        price: 10.0,
    }];
    let tracking = OrderTracking {
        id: ids::new_id(),
        order_id: order_id.clone(),
        status: OrderStatus::Pending,
        message: "Order placed and awaiting confirmation".to_string(),
        created_at,
    };
    store
        .create_order(order, items, tracking)
        .await
        .expect("seed order")
}
