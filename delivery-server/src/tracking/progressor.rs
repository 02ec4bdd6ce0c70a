//! 订单状态推进器
//!
//! 注册为 `TaskKind::Periodic`，在 `start_background_tasks()` 中启动。
//! 每个周期扫描所有未终结订单，按绝对时间线推进状态并追加跟踪记录，
//! 变更后尽力通知下单用户。单个订单的失败只记日志，不中断本轮扫描。

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::db::store::Store;
use crate::notify::NotificationService;
use crate::tracking::{advance_for_elapsed, status_message};

/// Outcome of one scan cycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    /// Non-terminal orders examined
    pub examined: usize,
    /// Transitions persisted (status write + tracking append)
    pub advanced: usize,
    /// Transitions skipped because another writer got there first
    pub lost_races: usize,
    /// Orders whose processing errored (logged, scan continued)
    pub failed: usize,
}

/// Recurring scan over active orders
pub struct OrderProgressor {
    store: Arc<dyn Store>,
    notifications: NotificationService,
    interval: Duration,
    shutdown: CancellationToken,
}

impl OrderProgressor {
    pub fn new(
        store: Arc<dyn Store>,
        notifications: NotificationService,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            notifications,
            interval,
            shutdown,
        }
    }

    /// 主循环：周期触发直到 shutdown
    pub async fn run(self) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Order progressor started");

        let mut ticker = tokio::time::interval(self.interval);
        // First tick fires immediately; skip it so a fresh boot does not
        // race the store initialization
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let now_ms = chrono::Utc::now().timestamp_millis();
                    let report = self.scan_once(now_ms).await;
                    if report.advanced > 0 || report.failed > 0 {
                        tracing::info!(
                            examined = report.examined,
                            advanced = report.advanced,
                            lost_races = report.lost_races,
                            failed = report.failed,
                            "Order scan cycle finished"
                        );
                    }
                }
            }
        }

        tracing::info!("Order progressor stopped");
    }

    /// One scan cycle with an injected clock.
    ///
    /// `now_ms` is captured once per cycle; every order in the cycle is
    /// evaluated against the same instant.
    pub async fn scan_once(&self, now_ms: i64) -> ScanReport {
        let mut report = ScanReport::default();

        let orders = match self.store.list_active_orders().await {
            Ok(orders) => orders,
            Err(e) => {
                tracing::error!(error = %e, "Order scan failed to list active orders");
                report.failed += 1;
                return report;
            }
        };

        for order in orders {
            report.examined += 1;

            let elapsed_ms = now_ms - order.created_at;
            let Some(next) = advance_for_elapsed(order.status, elapsed_ms) else {
                continue;
            };

            let message = status_message(next);
            match self
                .store
                .transition_order_status(&order.id, order.status, next, message, now_ms)
                .await
            {
                Ok(true) => {
                    report.advanced += 1;
                    tracing::info!(
                        order = %order.order_number,
                        from = %order.status,
                        to = %next,
                        "Order status advanced"
                    );
                    self.notify_status_change(&order.user_id, &order.order_number, next)
                        .await;
                }
                Ok(false) => {
                    // Another writer changed the status since we read it
                    report.lost_races += 1;
                    tracing::debug!(order = %order.order_number, "Status transition lost a race, skipping");
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        order = %order.order_number,
                        error = %e,
                        "Failed to advance order status, continuing scan"
                    );
                }
            }
        }

        report
    }

    /// Best-effort: a missing user or a failed send never affects the
    /// already-persisted transition
    async fn notify_status_change(
        &self,
        user_id: &str,
        order_number: &str,
        status: shared::models::OrderStatus,
    ) {
        match self.store.find_user_by_id(user_id).await {
            Ok(Some(user)) => {
                self.notifications
                    .status_update(&user.email, &user.name, order_number, status)
                    .await;
            }
            Ok(None) => {
                tracing::warn!(user_id = %user_id, "Order owner not found, skipping notification");
            }
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to load order owner for notification");
            }
        }
    }
}
