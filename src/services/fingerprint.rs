//! Canonicalization and hashing of an order's economically meaningful fields.
//!
//! The canonical form is a version-tagged string with a fixed field order and
//! fixed delimiters, so an unmodified order always produces the same digest
//! and a change to any covered field produces a different one. The order id
//! and the stored total are deliberately left out: the id adds nothing to the
//! content and the total is recomputed from the covered fields anyway.

use hex;
use sha2::{Digest, Sha256};

use models::{Amount, Order, OrderDetail, OrderItem};

/// Canonical representation of the order's priced content. Amounts are
/// rendered in raw minor units.
pub fn canonicalize(order: &Order, items: &[OrderItem], detail: Option<&OrderDetail>) -> String {
    let mut parts = Vec::with_capacity(items.len() + 3);
    parts.push(format!("v1;status={}", order.status.code()));
    parts.push(format!("delivery={},{}", order.delivery_method, order.delivery_price));
    for item in items {
        parts.push(format!(
            "item={},{},{},{}",
            item.product_id, item.price, item.discount, item.quantity
        ));
    }
    let (ship, product) = match detail {
        Some(detail) => (detail.ship_voucher_decrease, detail.product_voucher_decrease),
        None => (Amount::zero(), Amount::zero()),
    };
    parts.push(format!("vouchers={},{}", ship, product));
    parts.join("|")
}

/// Hex-encoded SHA-256 digest of the canonical string.
pub fn hash(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.input(canonical.as_bytes());
    hex::encode(hasher.result())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use models::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

    fn order() -> Order {
        Order {
            id: OrderId::new(7),
            user_id: UserId::new(1),
            status: OrderStatus::Pending,
            delivery_method: 2,
            delivery_price: Amount::new(2000),
            total_price: Some(Amount::new(25500)),
            created_at: NaiveDate::from_ymd(2019, 3, 14).and_hms(12, 0, 0),
        }
    }

    fn order_item(product_id: i64, price: i64, discount: i32, quantity: i32) -> OrderItem {
        OrderItem {
            id: OrderItemId::new(product_id),
            order_id: OrderId::new(7),
            product_id: ProductId::new(product_id),
            product_name: format!("product {}", product_id),
            price: Amount::new(price),
            discount,
            quantity,
            created_at: NaiveDate::from_ymd(2019, 3, 14).and_hms(12, 0, 0),
        }
    }

    #[test]
    fn canonical_form_is_stable() {
        let items = vec![order_item(1, 10000, 0, 2), order_item(2, 5000, 10, 1)];
        let first = canonicalize(&order(), &items, None);
        let second = canonicalize(&order(), &items, None);
        assert_eq!(first, second);
        assert_eq!(hash(&first), hash(&second));
    }

    #[test]
    fn canonical_form_spells_out_every_covered_field() {
        let items = vec![order_item(1, 10000, 0, 2)];
        let canonical = canonicalize(&order(), &items, None);
        assert_eq!(canonical, "v1;status=-1|delivery=2,2000|item=1,10000,0,2|vouchers=0,0");
    }

    #[test]
    fn any_field_change_shifts_the_digest() {
        let items = vec![order_item(1, 10000, 0, 2)];
        let baseline = hash(&canonicalize(&order(), &items, None));

        let mut cheaper = items.clone();
        cheaper[0].price = Amount::new(9999);
        assert_ne!(hash(&canonicalize(&order(), &cheaper, None)), baseline);

        let mut more = items.clone();
        more[0].quantity = 3;
        assert_ne!(hash(&canonicalize(&order(), &more, None)), baseline);

        let mut discounted = items.clone();
        discounted[0].discount = 50;
        assert_ne!(hash(&canonicalize(&order(), &discounted, None)), baseline);

        let mut free_shipping = order();
        free_shipping.delivery_price = Amount::zero();
        assert_ne!(hash(&canonicalize(&free_shipping, &items, None)), baseline);

        let mut shipped = order();
        shipped.status = OrderStatus::Shipped;
        assert_ne!(hash(&canonicalize(&shipped, &items, None)), baseline);
    }

    #[test]
    fn stored_total_does_not_participate() {
        let items = vec![order_item(1, 10000, 0, 2)];
        let mut inflated = order();
        inflated.total_price = Some(Amount::new(1));
        assert_eq!(
            canonicalize(&order(), &items, None),
            canonicalize(&inflated, &items, None)
        );
    }
}
