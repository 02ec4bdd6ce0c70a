//! Storefront end-to-end flow over the in-process router
//!
//! 注册 → 验证 → 登录 → 购物车 → 结账 → 支付，
//! 加上所有权 (403) 与管理端状态更新的校验。

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{extract_otp, login, request, seed_category, seed_food_item, seed_restaurant};

#[tokio::test]
async fn register_verify_login_round_trip() {
    let ctx = common::sqlite_ctx().await;
    let app = ctx.app();

    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Ana",
            "email": "ana@example.com",
            "password": "hunter22",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["user"]["verified"], false);
    assert_eq!(body["otp_sent"], true);

    // The OTP went through the recording transport
    let mails = ctx.mail.sent();
    assert_eq!(mails.len(), 1);
    assert_eq!(mails[0].to, "ana@example.com");
    let code = extract_otp(&mails[0].body);

    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/verify",
        None,
        Some(json!({ "email": "ana@example.com", "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["verified"], true);

    // Wrong code is rejected
    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/verify",
        None,
        Some(json!({ "email": "ana@example.com", "code": "000000" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let token = login(&app, "ana@example.com", "hunter22").await;
    let (status, body) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ana@example.com");
    assert_eq!(body["is_admin"], false);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let ctx = common::sqlite_ctx().await;
    let app = ctx.app();

    let payload = json!({
        "name": "Ana",
        "email": "dup@example.com",
        "password": "hunter22",
    });
    let (status, _) = request(&app, "POST", "/api/auth/register", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = request(&app, "POST", "/api/auth/register", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn cart_requires_authentication() {
    let ctx = common::sqlite_ctx().await;
    let app = ctx.app();

    let (status, _) = request(&app, "GET", "/api/cart", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn adding_same_item_twice_merges_into_one_line() {
    let ctx = common::sqlite_ctx().await;
    let app = ctx.app();
    let store = ctx.store();

    let restaurant = seed_restaurant(&store).await;
    let category = seed_category(&store, "Mains").await;
    let item = seed_food_item(&store, &restaurant.id, &category.id, "Fried Rice", 9.99).await;

    common::seed_user(&store, "bob@example.com", "hunter22").await;
    let token = login(&app, "bob@example.com", "hunter22").await;

    let add = |qty: i64| {
        json!({ "food_item_id": item.id, "quantity": qty })
    };
    let (status, _) = request(&app, "POST", "/api/cart", Some(&token), Some(add(1))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = request(&app, "POST", "/api/cart", Some(&token), Some(add(2))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 3);

    let (status, body) = request(&app, "GET", "/api/cart", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let lines = body.as_array().expect("cart is an array");
    assert_eq!(lines.len(), 1, "one row for the pair, not two");
    assert_eq!(lines[0]["item"]["quantity"], 3);
    assert_eq!(lines[0]["food_item"]["name"], "Fried Rice");
    assert_eq!(lines[0]["restaurant"]["name"], "Golden Wok");
}

#[tokio::test]
async fn checkout_snapshots_cart_and_clears_it() {
    let ctx = common::sqlite_ctx().await;
    let app = ctx.app();
    let store = ctx.store();

    let restaurant = seed_restaurant(&store).await;
    let category = seed_category(&store, "Mains").await;
    let rice = seed_food_item(&store, &restaurant.id, &category.id, "Fried Rice", 9.99).await;
    let soup = seed_food_item(&store, &restaurant.id, &category.id, "Hot Soup", 4.50).await;

    common::seed_user(&store, "carol@example.com", "hunter22").await;
    let token = login(&app, "carol@example.com", "hunter22").await;

    for (id, qty) in [(&rice.id, 3), (&soup.id, 1)] {
        let (status, _) = request(
            &app,
            "POST",
            "/api/cart",
            Some(&token),
            Some(json!({ "food_item_id": id, "quantity": qty })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, order) = request(
        &app,
        "POST",
        "/api/orders",
        Some(&token),
        Some(json!({
            "order": {
                "restaurant_id": restaurant.id,
                "delivery_address": "5 Test Street",
                "phone": "555-0101",
                "payment_method": "cod",
            },
            "items": [
                { "food_item_id": rice.id, "quantity": 3 },
                { "food_item_id": soup.id, "quantity": 1 },
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{order}");
    assert_eq!(order["status"], "pending");

    // total == subtotal + delivery_fee + tax at stored precision
    let subtotal = order["subtotal"].as_f64().unwrap();
    let fee = order["delivery_fee"].as_f64().unwrap();
    let tax = order["tax"].as_f64().unwrap();
    let total = order["total"].as_f64().unwrap();
    assert_eq!(subtotal, 34.47); // 3 * 9.99 + 4.50
    assert_eq!(fee, 4.99);
    assert_eq!(tax, 1.72); // 5% of 34.47, half-up
    assert!((total - (subtotal + fee + tax)).abs() < 1e-9);

    // Cart is empty after checkout
    let (_, cart) = request(&app, "GET", "/api/cart", Some(&token), None).await;
    assert_eq!(cart.as_array().map(Vec::len), Some(0));

    // Order items match the pre-checkout cart exactly (quantities + snapshots)
    let order_id = order["id"].as_str().unwrap();
    let (status, detail) = request(
        &app,
        "GET",
        &format!("/api/orders/{order_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = detail["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    let rice_line = items
        .iter()
        .find(|i| i["food_item_id"] == json!(rice.id))
        .unwrap();
    assert_eq!(rice_line["quantity"], 3);
    assert_eq!(rice_line["price"], 9.99);
    assert_eq!(rice_line["name"], "Fried Rice");

    // Initial tracking row is the pending one
    let tracking = detail["tracking"].as_array().unwrap();
    assert_eq!(tracking.len(), 1);
    assert_eq!(tracking[0]["status"], "pending");

    // A confirmation mail was handed to the transport
    assert!(
        ctx.mail
            .sent()
            .iter()
            .any(|m| m.subject.contains("placed") && m.to == "carol@example.com")
    );
}

#[tokio::test]
async fn empty_checkout_is_rejected() {
    let ctx = common::sqlite_ctx().await;
    let app = ctx.app();
    let store = ctx.store();

    let restaurant = seed_restaurant(&store).await;
    common::seed_user(&store, "dave@example.com", "hunter22").await;
    let token = login(&app, "dave@example.com", "hunter22").await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/orders",
        Some(&token),
        Some(json!({
            "order": {
                "restaurant_id": restaurant.id,
                "delivery_address": "5 Test Street",
                "phone": "555-0101",
                "payment_method": "cod",
            },
            "items": [],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn strangers_get_403_on_foreign_orders() {
    let ctx = common::sqlite_ctx().await;
    let app = ctx.app();
    let store = ctx.store();

    let restaurant = seed_restaurant(&store).await;
    let owner = common::seed_user(&store, "owner@example.com", "hunter22").await;
    common::seed_user(&store, "stranger@example.com", "hunter22").await;

    let order = common::seed_order(
        &store,
        &owner.id,
        &restaurant.id,
        common::now_ms(),
        shared::models::OrderStatus::Pending,
    )
    .await;

    let stranger_token = login(&app, "stranger@example.com", "hunter22").await;
    let (status, _) = request(
        &app,
        "GET",
        &format!("/api/orders/{}", order.id),
        Some(&stranger_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The owner still sees it
    let owner_token = login(&app, "owner@example.com", "hunter22").await;
    let (status, _) = request(
        &app,
        "GET",
        &format!("/api/orders/{}", order.id),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn payment_verify_confirms_pending_order_and_sends_receipt() {
    let ctx = common::sqlite_ctx().await;
    let app = ctx.app();
    let store = ctx.store();

    let restaurant = seed_restaurant(&store).await;
    let user = common::seed_user(&store, "erin@example.com", "hunter22").await;
    let order = common::seed_order(
        &store,
        &user.id,
        &restaurant.id,
        common::now_ms(),
        shared::models::OrderStatus::Pending,
    )
    .await;

    let token = login(&app, "erin@example.com", "hunter22").await;
    let (status, detail) = request(
        &app,
        "POST",
        "/api/payment/verify",
        Some(&token),
        Some(json!({ "order_id": order.id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{detail}");
    assert_eq!(detail["order"]["status"], "confirmed");
    assert_eq!(detail["order"]["payment_status"], "paid");

    // Exactly one tracking row carries the confirmed status
    let confirmed_rows: Vec<_> = detail["tracking"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|t| t["status"] == "confirmed")
        .collect();
    assert_eq!(confirmed_rows.len(), 1);

    // Receipt mail recorded on the mockable channel
    assert!(
        ctx.mail
            .sent()
            .iter()
            .any(|m| m.subject.contains("Payment received") && m.to == "erin@example.com")
    );
}

#[tokio::test]
async fn admin_gate_is_an_email_equality_check() {
    let ctx = common::sqlite_ctx().await;
    let app = ctx.app();
    let store = ctx.store();
    let admin_email = ctx.state.config.admin_email.clone();

    common::seed_user(&store, "user@example.com", "hunter22").await;
    common::seed_user(&store, &admin_email, "hunter22").await;

    let user_token = login(&app, "user@example.com", "hunter22").await;
    let (status, _) = request(&app, "GET", "/api/admin/users", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin_token = login(&app, &admin_email, "hunter22").await;
    let (status, body) = request(&app, "GET", "/api/admin/users", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    // Password hashes never serialize out of the admin listing
    assert!(body[0].get("password_hash").is_none());

    let (status, analytics) =
        request(&app, "GET", "/api/admin/analytics", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(analytics["users"], 2);
}

#[tokio::test]
async fn manual_status_updates_validate_the_timeline() {
    let ctx = common::sqlite_ctx().await;
    let app = ctx.app();
    let store = ctx.store();
    let admin_email = ctx.state.config.admin_email.clone();

    let restaurant = seed_restaurant(&store).await;
    let user = common::seed_user(&store, "frank@example.com", "hunter22").await;
    common::seed_user(&store, &admin_email, "hunter22").await;
    let order = common::seed_order(
        &store,
        &user.id,
        &restaurant.id,
        common::now_ms(),
        shared::models::OrderStatus::Pending,
    )
    .await;

    let admin_token = login(&app, &admin_email, "hunter22").await;
    let uri = format!("/api/orders/{}/status", order.id);

    // Forward move is fine
    let (status, body) = request(
        &app,
        "PUT",
        &uri,
        Some(&admin_token),
        Some(json!({ "status": "preparing" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "preparing");

    // Backward move is rejected
    let (status, _) = request(
        &app,
        "PUT",
        &uri,
        Some(&admin_token),
        Some(json!({ "status": "pending" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Cancel works from any active state...
    let (status, body) = request(
        &app,
        "PUT",
        &uri,
        Some(&admin_token),
        Some(json!({ "status": "cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");

    // ...and terminal orders are frozen
    let (status, _) = request(
        &app,
        "PUT",
        &uri,
        Some(&admin_token),
        Some(json!({ "status": "delivered" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Non-admin cannot touch the route at all
    let user_token = login(&app, "frank@example.com", "hunter22").await;
    let (status, _) = request(
        &app,
        "PUT",
        &uri,
        Some(&user_token),
        Some(json!({ "status": "delivered" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
