//! Order status progression
//!
//! 状态机本体：纯函数，定时器与 HTTP 状态路由都必须经由这里，
//! 配合存储层的条件更新 (CAS) 消除双写竞态。
//!
//! # 状态流转
//!
//! `pending → confirmed → preparing → out_for_delivery → delivered`
//!
//! 阈值按下单时刻的绝对时间线累计（不是状态驻留时长）：
//!
//! | 当前状态 | elapsed ≥ | 下一状态 |
//! |----------|-----------|----------|
//! | pending | 2 min | confirmed |
//! | confirmed | 5 min | preparing |
//! | preparing | 15 min | out_for_delivery |
//! | out_for_delivery | 25 min | delivered |
//!
//! `cancelled` 只能由管理操作进入，定时器不会取消订单。

pub mod progressor;

use shared::models::OrderStatus;
use thiserror::Error;

/// Cumulative minutes since order creation for each automatic transition
const CONFIRM_AFTER_MIN: i64 = 2;
const PREPARE_AFTER_MIN: i64 = 5;
const DISPATCH_AFTER_MIN: i64 = 15;
const DELIVER_AFTER_MIN: i64 = 25;

const MS_PER_MIN: i64 = 60_000;

/// Rejected status writes
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidTransition {
    #[error("Order is already {0} and cannot change status")]
    Terminal(OrderStatus),

    #[error("Cannot move status backwards from {from} to {to}")]
    Backward { from: OrderStatus, to: OrderStatus },

    #[error("Order is already {0}")]
    NoChange(OrderStatus),
}

/// Position of a status on the delivery timeline (cancelled sits outside it)
fn stage_index(status: OrderStatus) -> Option<u8> {
    match status {
        OrderStatus::Pending => Some(0),
        OrderStatus::Confirmed => Some(1),
        OrderStatus::Preparing => Some(2),
        OrderStatus::OutForDelivery => Some(3),
        OrderStatus::Delivered => Some(4),
        OrderStatus::Cancelled => None,
    }
}

/// Timer-side transition: at most one stage per evaluation.
///
/// Returns the next status when `elapsed_ms` since creation has crossed
/// the current stage's threshold, `None` otherwise. Terminal states never
/// advance. Even when several thresholds have been passed at once the
/// order still walks the timeline one stage per scan — stages are never
/// skipped.
pub fn advance_for_elapsed(current: OrderStatus, elapsed_ms: i64) -> Option<OrderStatus> {
    let minutes = elapsed_ms / MS_PER_MIN;
    match current {
        OrderStatus::Pending if minutes >= CONFIRM_AFTER_MIN => Some(OrderStatus::Confirmed),
        OrderStatus::Confirmed if minutes >= PREPARE_AFTER_MIN => Some(OrderStatus::Preparing),
        OrderStatus::Preparing if minutes >= DISPATCH_AFTER_MIN => {
            Some(OrderStatus::OutForDelivery)
        }
        OrderStatus::OutForDelivery if minutes >= DELIVER_AFTER_MIN => {
            Some(OrderStatus::Delivered)
        }
        _ => None,
    }
}

/// Manual (admin) transition check.
///
/// Terminal orders are frozen; the timeline only moves forward; any
/// non-terminal order can be cancelled.
pub fn validate_manual(
    current: OrderStatus,
    requested: OrderStatus,
) -> Result<(), InvalidTransition> {
    if current == requested {
        return Err(InvalidTransition::NoChange(current));
    }
    if current.is_terminal() {
        return Err(InvalidTransition::Terminal(current));
    }
    if requested == OrderStatus::Cancelled {
        return Ok(());
    }
    match (stage_index(current), stage_index(requested)) {
        (Some(from), Some(to)) if to > from => Ok(()),
        _ => Err(InvalidTransition::Backward {
            from: current,
            to: requested,
        }),
    }
}

/// Canned timeline message for a status
pub fn status_message(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Order placed and awaiting confirmation",
        OrderStatus::Confirmed => "Order confirmed by the restaurant",
        OrderStatus::Preparing => "The kitchen is preparing your order",
        OrderStatus::OutForDelivery => "Your order is out for delivery",
        OrderStatus::Delivered => "Order delivered. Enjoy your meal!",
        OrderStatus::Cancelled => "Order cancelled",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    fn min(m: i64) -> i64 {
        m * MS_PER_MIN
    }

    #[test]
    fn thresholds_are_cumulative_from_creation() {
        assert_eq!(advance_for_elapsed(Pending, min(1)), None);
        assert_eq!(advance_for_elapsed(Pending, min(2)), Some(Confirmed));
        assert_eq!(advance_for_elapsed(Confirmed, min(4)), None);
        assert_eq!(advance_for_elapsed(Confirmed, min(5)), Some(Preparing));
        assert_eq!(advance_for_elapsed(Preparing, min(14)), None);
        assert_eq!(advance_for_elapsed(Preparing, min(15)), Some(OutForDelivery));
        assert_eq!(advance_for_elapsed(OutForDelivery, min(24)), None);
        assert_eq!(advance_for_elapsed(OutForDelivery, min(25)), Some(Delivered));
    }

    #[test]
    fn one_stage_per_scan_even_when_very_late() {
        // An hour-old pending order still only moves to confirmed
        assert_eq!(advance_for_elapsed(Pending, min(60)), Some(Confirmed));
    }

    #[test]
    fn terminal_states_never_advance() {
        assert_eq!(advance_for_elapsed(Delivered, min(999)), None);
        assert_eq!(advance_for_elapsed(Cancelled, min(999)), None);
    }

    #[test]
    fn manual_forward_moves_are_allowed() {
        assert!(validate_manual(Pending, Confirmed).is_ok());
        assert!(validate_manual(Pending, OutForDelivery).is_ok());
        assert!(validate_manual(Preparing, Delivered).is_ok());
    }

    #[test]
    fn manual_backward_moves_are_rejected() {
        assert_eq!(
            validate_manual(Preparing, Pending),
            Err(InvalidTransition::Backward {
                from: Preparing,
                to: Pending
            })
        );
    }

    #[test]
    fn terminal_orders_are_frozen() {
        assert_eq!(
            validate_manual(Delivered, Cancelled),
            Err(InvalidTransition::Terminal(Delivered))
        );
        assert_eq!(
            validate_manual(Cancelled, Pending),
            Err(InvalidTransition::Terminal(Cancelled))
        );
    }

    #[test]
    fn any_active_order_can_be_cancelled() {
        assert!(validate_manual(Pending, Cancelled).is_ok());
        assert!(validate_manual(OutForDelivery, Cancelled).is_ok());
    }
}
