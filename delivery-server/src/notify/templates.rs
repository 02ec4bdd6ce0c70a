//! Mail templates
//!
//! Plain-text subject/body pairs. No markup — delivery mechanics beyond
//! the transport are someone else's problem.

use shared::models::{Order, OrderStatus};

pub fn otp(name: &str, code: &str) -> (String, String) {
    (
        "Your Bento verification code".to_string(),
        format!(
            "Hi {name},\n\n\
             Your verification code is: {code}\n\n\
             The code expires in 10 minutes. If you did not create a Bento \
             account, you can ignore this mail.\n"
        ),
    )
}

pub fn order_confirmation(name: &str, order: &Order) -> (String, String) {
    (
        format!("Order {} placed", order.order_number),
        format!(
            "Hi {name},\n\n\
             We received your order {number}.\n\n\
             Subtotal:     {subtotal:.2}\n\
             Delivery fee: {fee:.2}\n\
             Tax:          {tax:.2}\n\
             Total:        {total:.2}\n\n\
             Delivering to: {address}\n\n\
             We'll keep you posted as it moves along.\n",
            number = order.order_number,
            subtotal = order.subtotal,
            fee = order.delivery_fee,
            tax = order.tax,
            total = order.total,
            address = order.delivery_address,
        ),
    )
}

pub fn status_update(name: &str, order_number: &str, status: OrderStatus) -> (String, String) {
    let line = match status {
        OrderStatus::Pending => "Your order has been placed.",
        OrderStatus::Confirmed => "Your order has been confirmed by the restaurant.",
        OrderStatus::Preparing => "The kitchen is preparing your order.",
        OrderStatus::OutForDelivery => "Your order is out for delivery.",
        OrderStatus::Delivered => "Your order has been delivered. Enjoy!",
        OrderStatus::Cancelled => "Your order has been cancelled.",
    };
    (
        format!("Order {order_number}: {status}"),
        format!("Hi {name},\n\n{line}\n\nOrder number: {order_number}\n"),
    )
}

pub fn payment_receipt(name: &str, order: &Order) -> (String, String) {
    (
        format!("Payment received for order {}", order.order_number),
        format!(
            "Hi {name},\n\n\
             We received your payment of {total:.2} for order {number} \
             (paid via {method}).\n\n\
             Your order is confirmed.\n",
            total = order.total,
            number = order.order_number,
            method = order.payment_method,
        ),
    )
}
