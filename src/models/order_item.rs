use chrono::NaiveDateTime;
use validator::Validate;

use models::{Amount, OrderId, ProductId};

#[derive(Clone, Copy, Debug, Display, Default, PartialEq, Eq, PartialOrd, Ord, From, FromStr, Hash, Serialize, Deserialize)]
pub struct OrderItemId(i64);

impl OrderItemId {
    pub fn new(id: i64) -> Self {
        OrderItemId(id)
    }

    pub fn inner(&self) -> i64 {
        self.0
    }
}

/// Line item of an order. Price, discount and name are snapshotted from the
/// product at purchase time - owned value copies, never live references to
/// the mutable product record, and never mutated after insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Amount,
    pub discount: i32,
    pub quantity: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Amount,
    #[validate(range(min = "0", max = "100"))]
    pub discount: i32,
    #[validate(range(min = "1", max = "2147483647"))]
    pub quantity: i32,
}

/// The pricing-relevant slice of a line item, shared by the aggregator and
/// the voucher decrease calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedItem {
    pub price: Amount,
    pub discount: i32,
    pub quantity: i32,
}

impl PricedItem {
    /// Line subtotal in minor units. The zero-discount branch multiplies
    /// directly so the common case cannot pick up rounding drift; it is
    /// bit-identical to the discount formula at discount = 0 because the
    /// division by 100 is exact there.
    pub fn subtotal(&self) -> Option<Amount> {
        if self.discount == 0 {
            self.price.checked_mul(self.quantity as i64)
        } else {
            self.price
                .checked_mul((100 - self.discount) as i64)?
                .checked_mul(self.quantity as i64)?
                .checked_div_round_half_up(100)
        }
    }
}

impl<'a> From<&'a OrderItem> for PricedItem {
    fn from(item: &OrderItem) -> Self {
        PricedItem {
            price: item.price,
            discount: item.discount,
            quantity: item.quantity,
        }
    }
}

impl<'a> From<&'a NewOrderItem> for PricedItem {
    fn from(item: &NewOrderItem) -> Self {
        PricedItem {
            price: item.price,
            discount: item.discount,
            quantity: item.quantity,
        }
    }
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
    fn test_subtotal_zero_discount_matches_formula() {
        // price * qty vs price * (100 - 0) * qty / 100 must agree exactly
        for &(price, qty) in &[(10000i64, 2i32), (4999, 3), (1, 7), (333, 1)] {
            let fast = item(price, 0, qty).subtotal().unwrap();
            let formula = Amount::new(price)
                .checked_mul(100)
                .unwrap()
                .checked_mul(qty as i64)
                .unwrap()
                .checked_div_round_half_up(100)
                .unwrap();
            assert_eq!(fast, formula);
        }
    }

    #[test]
    fn test_subtotal_discounted() {
        // 50.00 with 10% off -> 45.00
        assert_eq!(item(5000, 10, 1).subtotal(), Some(Amount::new(4500)));
        // 0.99 with 33% off: 99 * 67 / 100 = 66.33 -> rounds to 66 cents
        assert_eq!(item(99, 33, 1).subtotal(), Some(Amount::new(66)));
        // tie rounds up: 0.50 with 25% off: 50 * 75 / 100 = 37.5 -> 38
        assert_eq!(item(50, 25, 1).subtotal(), Some(Amount::new(38)));
    }

    #[test]
    fn test_subtotal_overflow() {
        assert_eq!(item(i64::max_value(), 50, 2).subtotal(), None);
    }

    #[test]
    fn test_new_item_constraints() {
        let new_item = NewOrderItem {
            order_id: OrderId::new(1),
            product_id: ProductId::new(1),
            product_name: "kettle".to_string(),
            price: Amount::new(10000),
            discount: 0,
            quantity: 1,
        };
        assert!(new_item.validate().is_ok());

        let mut discounted_past_free = new_item.clone();
        discounted_past_free.discount = 101;
        assert!(discounted_past_free.validate().is_err());

        let mut nothing_ordered = new_item.clone();
        nothing_ordered.quantity = 0;
        assert!(nothing_ordered.validate().is_err());
    }
}
