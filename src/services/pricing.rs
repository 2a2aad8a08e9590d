//! Price aggregation: deterministic computation of an order's total from
//! line items, the delivery price and voucher decreases. All arithmetic is
//! in minor units on checked integer ops; any overflow or out-of-range input
//! fails the computation instead of silently wrapping.

use serde_json;
use validator::{ValidationError, ValidationErrors};

use models::{Amount, PricedItem};

use super::error::{Error, ErrorKind};

/// Total price of an order: the sum of line subtotals, plus the delivery
/// price, plus every voucher decrease. Decreases are stored non-positive so
/// addition always subtracts. Pure function of its inputs.
pub fn compute_total(
    items: &[PricedItem],
    delivery_price: Amount,
    voucher_decreases: &[Amount],
) -> Result<Amount, Error> {
    check_items(items)?;
    let mut total = Amount::zero();
    for item in items {
        let line = item.subtotal().ok_or_else(|| overflow("line subtotal"))?;
        total = total.checked_add(line).ok_or_else(|| overflow("order total"))?;
    }
    total = total
        .checked_add(delivery_price)
        .ok_or_else(|| overflow("order total"))?;
    for decrease in voucher_decreases {
        if !decrease.is_non_positive() {
            return Err(violation("voucher_decrease", "voucher decreases must be non-positive"));
        }
        total = total.checked_add(*decrease).ok_or_else(|| overflow("order total"))?;
    }
    Ok(total)
}

/// Rejects quantities below one and discount percents outside `[0, 100]`.
pub fn check_items(items: &[PricedItem]) -> Result<(), Error> {
    for item in items {
        if item.discount < 0 || item.discount > 100 {
            return Err(violation("discount", "discount percent must be within [0, 100]"));
        }
        if item.quantity < 1 {
            return Err(violation("quantity", "quantity must be positive"));
        }
    }
    Ok(())
}

pub fn violation(field: &'static str, message: &'static str) -> Error {
    let mut error = ValidationError::new("invalid");
    error.message = Some(message.into());
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    ErrorKind::InvalidPricingInput(serde_json::to_value(&errors).unwrap_or_default()).into()
}

fn overflow(what: &'static str) -> Error {
    let mut error = ValidationError::new("overflow");
    error.message = Some(format!("{} overflowed the amount range", what).into());
    let mut errors = ValidationErrors::new();
    errors.add("amount", error);
    ErrorKind::InvalidPricingInput(serde_json::to_value(&errors).unwrap_or_default()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: i64, discount: i32, quantity: i32) -> PricedItem {
        PricedItem {
            price: Amount::new(price),
            discount,
            quantity,
        }
    }

    #[test]
    fn total_combines_lines_delivery_and_decreases() {
        // 2 x 100.00 + 1 x 50.00 at 10% + 20.00 delivery - 10.00 voucher
        let items = vec![item(10000, 0, 2), item(5000, 10, 1)];
        let total = compute_total(&items, Amount::new(2000), &[Amount::new(-1000)]).unwrap();
        assert_eq!(total, Amount::new(25500));
    }

    #[test]
    fn total_without_vouchers_is_lines_plus_delivery() {
        let items = vec![item(990, 0, 3)];
        let total = compute_total(&items, Amount::new(500), &[]).unwrap();
        assert_eq!(total, Amount::new(3470));
    }

    #[test]
    fn empty_order_totals_to_delivery_price() {
        let total = compute_total(&[], Amount::new(2000), &[]).unwrap();
        assert_eq!(total, Amount::new(2000));
    }

    #[test]
    fn discount_outside_percent_range_is_rejected() {
        let err = compute_total(&[item(100, 101, 1)], Amount::zero(), &[]).unwrap_err();
        match err.kind() {
            ErrorKind::InvalidPricingInput(_) => {}
            kind => panic!("unexpected error kind: {:?}", kind),
        }
        assert!(compute_total(&[item(100, -1, 1)], Amount::zero(), &[]).is_err());
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        assert!(compute_total(&[item(100, 0, 0)], Amount::zero(), &[]).is_err());
        assert!(compute_total(&[item(100, 0, -2)], Amount::zero(), &[]).is_err());
    }

    #[test]
    fn positive_decrease_is_rejected() {
        let err = compute_total(&[item(100, 0, 1)], Amount::zero(), &[Amount::new(10)]).unwrap_err();
        match err.kind() {
            ErrorKind::InvalidPricingInput(_) => {}
            kind => panic!("unexpected error kind: {:?}", kind),
        }
    }

    #[test]
    fn overflow_is_an_error_not_a_wrap() {
        let items = vec![item(i64::max_value(), 0, 2)];
        assert!(compute_total(&items, Amount::zero(), &[]).is_err());
    }
}
