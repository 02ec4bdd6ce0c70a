//! Store contract tests, run against both adapters
//!
//! 同一组断言分别跑 SQLite 与 SurrealDB，保证双后端行为一致。

mod common;

use std::sync::Arc;

use delivery_server::db::store::{Store, StoreError};
use shared::models::OrderStatus;

async fn cart_pair_is_unique(store: Arc<dyn Store>) {
    let user = common::seed_user(&store, "cart@example.com", "hunter22").await;
    let restaurant = common::seed_restaurant(&store).await;
    let category = common::seed_category(&store, "Mains").await;
    let item = common::seed_food_item(&store, &restaurant.id, &category.id, "Rice", 9.0).await;

    let now = common::now_ms();
    store.add_to_cart(&user.id, &item.id, 1, now).await.unwrap();
    let merged = store.add_to_cart(&user.id, &item.id, 2, now).await.unwrap();
    assert_eq!(merged.quantity, 3);

    let items = store.cart_items(&user.id).await.unwrap();
    assert_eq!(items.len(), 1, "one row per (user, food_item) pair");
    assert_eq!(items[0].quantity, 3);

    // Setting quantity to zero removes the row
    let none = store.set_cart_quantity(&user.id, &item.id, 0).await.unwrap();
    assert!(none.is_none());
    assert!(store.cart_items(&user.id).await.unwrap().is_empty());
}

async fn duplicate_email_is_rejected(store: Arc<dyn Store>) {
    common::seed_user(&store, "one@example.com", "hunter22").await;
    let again = shared::models::User {
        id: delivery_server::utils::ids::new_id(),
        name: "Other".to_string(),
        email: "one@example.com".to_string(),
        phone: None,
        password_hash: "x".to_string(),
        verified: false,
        otp_code: None,
        otp_expires_at: None,
        is_active: true,
        created_at: common::now_ms(),
    };
    let err = store.create_user(again).await.unwrap_err();
    assert!(matches!(err, StoreError::Duplicate(_)), "got {err:?}");
}

async fn status_cas_rejects_stale_writers(store: Arc<dyn Store>) {
    let user = common::seed_user(&store, "cas@example.com", "hunter22").await;
    let restaurant = common::seed_restaurant(&store).await;
    // Backdated a minute so the transition's tracking row sorts after the
    // initial one
    let order = common::seed_order(
        &store,
        &user.id,
        &restaurant.id,
        common::now_ms() - 60_000,
        OrderStatus::Pending,
    )
    .await;

    let now = common::now_ms();

    // Writer with a stale expectation loses without side effects
    let applied = store
        .transition_order_status(
            &order.id,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            "should not land",
            now,
        )
        .await
        .unwrap();
    assert!(!applied);
    let current = store.find_order(&order.id).await.unwrap().unwrap();
    assert_eq!(current.status, OrderStatus::Pending);
    assert_eq!(store.tracking_for_order(&order.id).await.unwrap().len(), 1);

    // Correct expectation wins and appends exactly one tracking row
    let applied = store
        .transition_order_status(
            &order.id,
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            "Order confirmed by the restaurant",
            now,
        )
        .await
        .unwrap();
    assert!(applied);
    let current = store.find_order(&order.id).await.unwrap().unwrap();
    assert_eq!(current.status, OrderStatus::Confirmed);
    let tracking = store.tracking_for_order(&order.id).await.unwrap();
    assert_eq!(tracking.len(), 2);
    assert_eq!(tracking[1].status, OrderStatus::Confirmed);
}

async fn order_detail_joins_everything(store: Arc<dyn Store>) {
    let user = common::seed_user(&store, "joins@example.com", "hunter22").await;
    let restaurant = common::seed_restaurant(&store).await;
    let order = common::seed_order(
        &store,
        &user.id,
        &restaurant.id,
        common::now_ms(),
        OrderStatus::Pending,
    )
    .await;

    let detail = store.order_detail(&order.id).await.unwrap().unwrap();
    assert_eq!(detail.order.id, order.id);
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].name, "Fried Rice");
    assert_eq!(
        detail.restaurant.as_ref().map(|r| r.name.as_str()),
        Some("Golden Wok")
    );
    assert_eq!(detail.tracking.len(), 1);
    assert_eq!(detail.tracking[0].status, OrderStatus::Pending);

    // Newest-first listing for the owner
    let listed = store.list_orders_for_user(&user.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].order.id, order.id);

    // Unknown ids read as absent, not as errors
    assert!(store.order_detail("missing").await.unwrap().is_none());
    assert!(store.find_order("missing").await.unwrap().is_none());
}

async fn cart_lines_tolerate_deleted_menu_entries(store: Arc<dyn Store>) {
    let user = common::seed_user(&store, "ghost@example.com", "hunter22").await;
    let now = common::now_ms();

    // Cart row pointing at a food item that no longer exists
    store
        .add_to_cart(&user.id, "no-such-item", 1, now)
        .await
        .unwrap();

    let lines = store.cart_lines(&user.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].food_item.is_none(), "absent item, not an error");
    assert!(lines[0].restaurant.is_none());
}

async fn analytics_counts_add_up(store: Arc<dyn Store>) {
    let user = common::seed_user(&store, "stats@example.com", "hunter22").await;
    let restaurant = common::seed_restaurant(&store).await;
    common::seed_order(
        &store,
        &user.id,
        &restaurant.id,
        common::now_ms(),
        OrderStatus::Pending,
    )
    .await;
    common::seed_order(
        &store,
        &user.id,
        &restaurant.id,
        common::now_ms(),
        OrderStatus::Delivered,
    )
    .await;
    common::seed_order(
        &store,
        &user.id,
        &restaurant.id,
        common::now_ms(),
        OrderStatus::Cancelled,
    )
    .await;

    let analytics = store.analytics().await.unwrap();
    assert_eq!(analytics.users, 1);
    assert_eq!(analytics.restaurants, 1);
    assert_eq!(analytics.orders, 3);
    assert_eq!(analytics.active_orders, 1);
    assert_eq!(analytics.delivered_orders, 1);
    // Cancelled orders do not count towards revenue: 2 * 25.99
    assert!((analytics.revenue - 51.98).abs() < 1e-9);
}

// ========== SQLite ==========

#[tokio::test]
async fn sqlite_cart_pair_is_unique() {
    cart_pair_is_unique(common::sqlite_ctx().await.store()).await;
}

#[tokio::test]
async fn sqlite_duplicate_email_is_rejected() {
    duplicate_email_is_rejected(common::sqlite_ctx().await.store()).await;
}

#[tokio::test]
async fn sqlite_status_cas_rejects_stale_writers() {
    status_cas_rejects_stale_writers(common::sqlite_ctx().await.store()).await;
}

#[tokio::test]
async fn sqlite_order_detail_joins_everything() {
    order_detail_joins_everything(common::sqlite_ctx().await.store()).await;
}

#[tokio::test]
async fn sqlite_cart_lines_tolerate_deleted_menu_entries() {
    cart_lines_tolerate_deleted_menu_entries(common::sqlite_ctx().await.store()).await;
}

#[tokio::test]
async fn sqlite_analytics_counts_add_up() {
    analytics_counts_add_up(common::sqlite_ctx().await.store()).await;
}

// ========== SurrealDB ==========

#[tokio::test]
async fn surreal_cart_pair_is_unique() {
    let ctx = common::surreal_ctx().await;
    cart_pair_is_unique(ctx.store()).await;
}

#[tokio::test]
async fn surreal_duplicate_email_is_rejected() {
    let ctx = common::surreal_ctx().await;
    duplicate_email_is_rejected(ctx.store()).await;
}

#[tokio::test]
async fn surreal_status_cas_rejects_stale_writers() {
    let ctx = common::surreal_ctx().await;
    status_cas_rejects_stale_writers(ctx.store()).await;
}

#[tokio::test]
async fn surreal_order_detail_joins_everything() {
    let ctx = common::surreal_ctx().await;
    order_detail_joins_everything(ctx.store()).await;
}

#[tokio::test]
async fn surreal_cart_lines_tolerate_deleted_menu_entries() {
    let ctx = common::surreal_ctx().await;
    cart_lines_tolerate_deleted_menu_entries(ctx.store()).await;
}

#[tokio::test]
async fn surreal_analytics_counts_add_up() {
    let ctx = common::surreal_ctx().await;
    analytics_counts_add_up(ctx.store()).await;
}
