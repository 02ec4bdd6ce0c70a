//! Order status progressor — scan cycles with an injected clock

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use delivery_server::db::store::Store;
use delivery_server::notify::{MailTransport, NotificationService};
use delivery_server::tracking::progressor::OrderProgressor;
use shared::models::OrderStatus;

const MIN_MS: i64 = 60_000;

fn progressor_for(ctx: &common::TestCtx) -> OrderProgressor {
    let transport: Arc<dyn MailTransport> = ctx.mail.clone();
    OrderProgressor::new(
        ctx.store(),
        NotificationService::new(transport),
        Duration::from_secs(45),
        CancellationToken::new(),
    )
}

async fn seed_pending_order(
    ctx: &common::TestCtx,
    age_minutes: i64,
    now: i64,
) -> shared::models::Order {
    let store = ctx.store();
    let user = common::seed_user(&store, &format!("o{age_minutes}@example.com"), "hunter22").await;
    let restaurant = common::seed_restaurant(&store).await;
    common::seed_order(
        &store,
        &user.id,
        &restaurant.id,
        now - age_minutes * MIN_MS,
        OrderStatus::Pending,
    )
    .await
}

#[tokio::test]
async fn three_minute_old_pending_order_confirms_in_one_scan() {
    let ctx = common::sqlite_ctx().await;
    let now = common::now_ms();
    let order = seed_pending_order(&ctx, 3, now).await;

    let progressor = progressor_for(&ctx);
    let report = progressor.scan_once(now).await;
    assert_eq!(report.examined, 1);
    assert_eq!(report.advanced, 1);
    assert_eq!(report.failed, 0);

    let store = ctx.store();
    let updated = store.find_order(&order.id).await.unwrap().unwrap();
    assert_eq!(updated.status, OrderStatus::Confirmed);

    // Exactly one tracking row carries the confirmed status
    let tracking = store.tracking_for_order(&order.id).await.unwrap();
    let confirmed: Vec<_> = tracking
        .iter()
        .filter(|t| t.status == OrderStatus::Confirmed)
        .collect();
    assert_eq!(confirmed.len(), 1);

    // The owner was notified once
    assert_eq!(ctx.mail.sent().len(), 1);
}

#[tokio::test]
async fn scan_below_threshold_writes_nothing() {
    let ctx = common::sqlite_ctx().await;
    let now = common::now_ms();
    let order = seed_pending_order(&ctx, 1, now).await;

    let progressor = progressor_for(&ctx);
    let report = progressor.scan_once(now).await;
    assert_eq!(report.examined, 1);
    assert_eq!(report.advanced, 0);

    let store = ctx.store();
    let unchanged = store.find_order(&order.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, OrderStatus::Pending);
    assert_eq!(store.tracking_for_order(&order.id).await.unwrap().len(), 1);
    assert!(ctx.mail.sent().is_empty(), "zero notifications on a no-op scan");
}

#[tokio::test]
async fn repeated_scans_are_idempotent_between_thresholds() {
    let ctx = common::sqlite_ctx().await;
    let now = common::now_ms();
    let order = seed_pending_order(&ctx, 3, now).await;
    let progressor = progressor_for(&ctx);

    assert_eq!(progressor.scan_once(now).await.advanced, 1);

    // Same instant again: nothing has crossed a new threshold
    let report = progressor.scan_once(now).await;
    assert_eq!(report.advanced, 0);
    assert_eq!(ctx.mail.sent().len(), 1, "no duplicate notification");
    let tracking = ctx.store().tracking_for_order(&order.id).await.unwrap();
    assert_eq!(tracking.len(), 2); // pending + confirmed only
}

#[tokio::test]
async fn very_old_order_walks_one_stage_per_scan_without_skipping() {
    let ctx = common::sqlite_ctx().await;
    let now = common::now_ms();
    let order = seed_pending_order(&ctx, 60, now).await;
    let progressor = progressor_for(&ctx);
    let store = ctx.store();

    let expected = [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];
    for (i, want) in expected.into_iter().enumerate() {
        // Each cycle runs at a later instant, like the real timer
        let scan_now = now + (i as i64 + 1) * 1_000;
        let report = progressor.scan_once(scan_now).await;
        assert_eq!(report.advanced, 1);
        let current = store.find_order(&order.id).await.unwrap().unwrap();
        assert_eq!(current.status, want, "stages advance one at a time");
    }

    // Terminal: further scans see nothing to do
    let report = progressor.scan_once(now + 10_000).await;
    assert_eq!(report.examined, 0);
    assert_eq!(report.advanced, 0);

    // The timeline holds every stage exactly once, in order
    let tracking = store.tracking_for_order(&order.id).await.unwrap();
    let statuses: Vec<OrderStatus> = tracking.iter().map(|t| t.status).collect();
    assert_eq!(
        statuses,
        vec![
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
        ]
    );
}

#[tokio::test]
async fn cancelled_orders_never_advance() {
    let ctx = common::sqlite_ctx().await;
    let store = ctx.store();
    let now = common::now_ms();

    let user = common::seed_user(&store, "gone@example.com", "hunter22").await;
    let restaurant = common::seed_restaurant(&store).await;
    let order = common::seed_order(
        &store,
        &user.id,
        &restaurant.id,
        now - 60 * MIN_MS,
        OrderStatus::Cancelled,
    )
    .await;

    let progressor = progressor_for(&ctx);
    let report = progressor.scan_once(now).await;
    assert_eq!(report.examined, 0, "terminal orders are outside the scan set");

    let unchanged = store.find_order(&order.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn threshold_boundary_is_inclusive() {
    let ctx = common::sqlite_ctx().await;
    let now = common::now_ms();
    let store = ctx.store();
    let user = common::seed_user(&store, "edge@example.com", "hunter22").await;
    let restaurant = common::seed_restaurant(&store).await;

    // 1 second short of 2 minutes: stays pending
    let young = common::seed_order(
        &store,
        &user.id,
        &restaurant.id,
        now - (2 * MIN_MS - 1_000),
        OrderStatus::Pending,
    )
    .await;
    // Exactly 2 minutes: confirms
    let ripe = common::seed_order(
        &store,
        &user.id,
        &restaurant.id,
        now - 2 * MIN_MS,
        OrderStatus::Pending,
    )
    .await;

    let progressor = progressor_for(&ctx);
    progressor.scan_once(now).await;

    assert_eq!(
        store.find_order(&young.id).await.unwrap().unwrap().status,
        OrderStatus::Pending
    );
    assert_eq!(
        store.find_order(&ripe.id).await.unwrap().unwrap().status,
        OrderStatus::Confirmed
    );
}

#[tokio::test]
async fn progressor_works_on_the_document_backend_too() {
    let ctx = common::surreal_ctx().await;
    let now = common::now_ms();
    let order = seed_pending_order(&ctx, 3, now).await;

    let progressor = progressor_for(&ctx);
    let report = progressor.scan_once(now).await;
    assert_eq!(report.advanced, 1);

    let store = ctx.store();
    let updated = store.find_order(&order.id).await.unwrap().unwrap();
    assert_eq!(updated.status, OrderStatus::Confirmed);
    let tracking = store.tracking_for_order(&order.id).await.unwrap();
    assert_eq!(tracking.len(), 2);
}
