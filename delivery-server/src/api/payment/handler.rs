//! Payment API Handlers
//!
//! 模拟支付：确认永远成功。标记已支付；pending 订单顺带确认
//! (CAS，输给推进器也无妨——状态已经在 confirmed 之后)。

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::tracking;
use crate::utils::{AppError, AppResult};
use shared::models::{OrderDetail, OrderStatus};

/// Payment verification request
#[derive(Debug, Deserialize)]
pub struct PaymentVerifyRequest {
    pub order_id: String,
}

/// POST /api/payment/verify - 模拟支付确认
pub async fn verify(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(payload): Json<PaymentVerifyRequest>,
) -> AppResult<Json<OrderDetail>> {
    let order = state
        .store
        .find_order(&payload.order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", payload.order_id)))?;

    if order.user_id != current.id && !state.config.is_admin(&current.email) {
        return Err(AppError::forbidden("You do not own this order"));
    }

    let now_ms = chrono::Utc::now().timestamp_millis();
    state.store.set_payment_paid(&order.id, now_ms).await?;

    // A still-pending order jumps straight to confirmed
    if order.status == OrderStatus::Pending {
        let message = tracking::status_message(OrderStatus::Confirmed);
        let applied = state
            .store
            .transition_order_status(
                &order.id,
                OrderStatus::Pending,
                OrderStatus::Confirmed,
                message,
                now_ms,
            )
            .await?;
        if !applied {
            tracing::debug!(order = %order.order_number, "Order already past pending at payment time");
        }
    }

    tracing::info!(order = %order.order_number, "Payment verified");

    let detail = state
        .store
        .order_detail(&order.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", order.id)))?;

    // Receipt mail, best-effort
    state
        .notifications
        .payment_receipt(&current.email, &current.name, &detail.order)
        .await;

    Ok(Json(detail))
}
