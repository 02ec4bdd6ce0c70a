//! Order API Handlers
//!
//! 结账在服务端重新快照价格并计算金额拆分；客户端只提交订单头和
//! 购买行。手工状态更新 (admin) 与定时推进器共用同一套转移校验与
//! CAS 写入。

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::{AdminUser, CurrentUser};
use crate::core::ServerState;
use crate::tracking;
use crate::utils::money;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_SHORT_TEXT_LEN, validate_quantity, validate_required_text,
};
use crate::utils::{AppError, AppResult, ids};
use shared::models::{
    CheckoutRequest, Order, OrderDetail, OrderItem, OrderStatus, OrderTracking, PaymentStatus,
    StatusUpdateRequest,
};

/// POST /api/orders - 结账：从购买行创建订单，成功后清空购物车
pub async fn checkout(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<Order>> {
    let header = &payload.order;
    validate_required_text(&header.delivery_address, "delivery_address", MAX_ADDRESS_LEN)?;
    validate_required_text(&header.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&header.payment_method, "payment_method", MAX_SHORT_TEXT_LEN)?;
    if payload.items.is_empty() {
        return Err(AppError::validation("An order needs at least one item"));
    }

    let restaurant = state
        .store
        .find_restaurant(&header.restaurant_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Restaurant {} not found", header.restaurant_id))
        })?;

    let now_ms = chrono::Utc::now().timestamp_millis();
    let order_id = ids::new_id();

    // Snapshot name and price per line from the live menu
    let mut items = Vec::with_capacity(payload.items.len());
    let mut price_lines = Vec::with_capacity(payload.items.len());
    for line in &payload.items {
        validate_quantity(line.quantity)?;
        let food_item = state
            .store
            .find_food_item(&line.food_item_id)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!("Food item {} no longer exists", line.food_item_id))
            })?;
        if food_item.restaurant_id != restaurant.id {
            return Err(AppError::validation(format!(
                "'{}' does not belong to restaurant {}",
                food_item.name, restaurant.name
            )));
        }
        price_lines.push((food_item.price, line.quantity));
        items.push(OrderItem {
            id: ids::new_id(),
            order_id: order_id.clone(),
            food_item_id: food_item.id,
            name: food_item.name,
            quantity: line.quantity,
            price: food_item.price,
        });
    }

    let totals = money::compute_totals(&price_lines, restaurant.delivery_fee);

    let order = Order {
        id: order_id.clone(),
        user_id: current.id.clone(),
        restaurant_id: restaurant.id.clone(),
        order_number: ids::generate_order_number(now_ms),
        status: OrderStatus::Pending,
        subtotal: totals.subtotal,
        delivery_fee: totals.delivery_fee,
        tax: totals.tax,
        total: totals.total,
        delivery_address: header.delivery_address.clone(),
        phone: header.phone.clone(),
        payment_method: header.payment_method.clone(),
        payment_status: PaymentStatus::Pending,
        created_at: now_ms,
        updated_at: now_ms,
    };

    let tracking = OrderTracking {
        id: ids::new_id(),
        order_id: order_id.clone(),
        status: OrderStatus::Pending,
        message: tracking::status_message(OrderStatus::Pending).to_string(),
        created_at: now_ms,
    };

    let order = state.store.create_order(order, items, tracking).await?;

    // Checkout consumed the cart
    state.store.clear_cart(&current.id).await?;

    tracing::info!(
        order = %order.order_number,
        user_id = %current.id,
        total = order.total,
        "Order placed"
    );

    // Best-effort confirmation mail
    state
        .notifications
        .order_confirmation(&current.email, &current.name, &order)
        .await;

    Ok(Json(order))
}

/// GET /api/orders - 当前用户订单，倒序，含明细
pub async fn list(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<Vec<OrderDetail>>> {
    let orders = state.store.list_orders_for_user(&current.id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 单个订单；非本人且非 admin 返回 403
pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    let detail = state
        .store
        .order_detail(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;

    if detail.order.user_id != current.id && !state.config.is_admin(&current.email) {
        return Err(AppError::forbidden("You do not own this order"));
    }

    Ok(Json(detail))
}

/// PUT /api/orders/:id/status - 手工状态更新 (admin)
///
/// 与推进器走同一套转移校验；CAS 落库，竞态失败返回 409。
pub async fn update_status(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .store
        .find_order(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;

    tracking::validate_manual(order.status, payload.status)
        .map_err(|e| AppError::validation(e.to_string()))?;

    let now_ms = chrono::Utc::now().timestamp_millis();
    let message = tracking::status_message(payload.status);
    let applied = state
        .store
        .transition_order_status(&id, order.status, payload.status, message, now_ms)
        .await?;
    if !applied {
        return Err(AppError::conflict(
            "Order status changed concurrently, reload and retry",
        ));
    }

    tracing::info!(
        order = %order.order_number,
        from = %order.status,
        to = %payload.status,
        "Order status updated manually"
    );

    // Notify the owner, best-effort
    if let Ok(Some(owner)) = state.store.find_user_by_id(&order.user_id).await {
        state
            .notifications
            .status_update(&owner.email, &owner.name, &order.order_number, payload.status)
            .await;
    }

    let updated = state
        .store
        .find_order(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    Ok(Json(updated))
}
