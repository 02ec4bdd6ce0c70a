//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization. Rounding is 2 decimal places, half-up.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tax rate applied at checkout: 5%
pub const TAX_RATE_PERCENT: i64 = 5;

/// Maximum allowed price per item
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Round a decimal to monetary precision
fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert an f64 price into a Decimal, rounded to monetary precision
pub fn to_decimal(value: f64) -> Decimal {
    round_money(Decimal::from_f64(value).unwrap_or(Decimal::ZERO))
}

/// Convert back to the storage representation
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or(0.0)
}

/// Monetary breakdown of an order, computed once at checkout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax: f64,
    pub total: f64,
}

/// Compute the order breakdown from price/quantity pairs and a delivery fee.
///
/// `total == subtotal + delivery_fee + tax` holds exactly at the stored
/// 2-decimal precision: each component is rounded first, then summed.
pub fn compute_totals(lines: &[(f64, i64)], delivery_fee: f64) -> OrderTotals {
    let mut subtotal = Decimal::ZERO;
    for (price, quantity) in lines {
        subtotal += to_decimal(*price) * Decimal::from(*quantity);
    }
    let subtotal = round_money(subtotal);
    let fee = to_decimal(delivery_fee);
    let tax = round_money(subtotal * Decimal::from(TAX_RATE_PERCENT) / Decimal::from(100));
    let total = subtotal + fee + tax;

    OrderTotals {
        subtotal: to_f64(subtotal),
        delivery_fee: to_f64(fee),
        tax: to_f64(tax),
        total: to_f64(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_add_up_exactly() {
        let totals = compute_totals(&[(9.99, 3), (2.5, 1)], 4.99);
        assert_eq!(totals.subtotal, 32.47);
        assert_eq!(totals.delivery_fee, 4.99);
        assert_eq!(totals.tax, 1.62); // 5% of 32.47, half-up
        assert_eq!(totals.total, 39.08);
        assert!(
            (totals.total - (totals.subtotal + totals.delivery_fee + totals.tax)).abs() < 1e-9
        );
    }

    #[test]
    fn empty_cart_totals_are_zero_plus_fee() {
        let totals = compute_totals(&[], 3.0);
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.tax, 0.0);
        assert_eq!(totals.total, 3.0);
    }

    #[test]
    fn float_noise_does_not_leak_into_totals() {
        // 0.1 + 0.2 style inputs stay at 2 decimals through Decimal math
        let totals = compute_totals(&[(0.1, 1), (0.2, 1)], 0.0);
        assert_eq!(totals.subtotal, 0.3);
    }
}
