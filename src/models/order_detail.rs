use models::{Amount, OrderId, VoucherId};

#[derive(Clone, Copy, Debug, Display, Default, PartialEq, Eq, PartialOrd, Ord, From, FromStr, Hash, Serialize, Deserialize)]
pub struct AddressId(i64);

impl AddressId {
    pub fn new(id: i64) -> Self {
        AddressId(id)
    }

    pub fn inner(&self) -> i64 {
        self.0
    }
}

/// Pricing breakdown of an order: the derived total plus the voucher
/// associations. At most one shipping voucher and one product voucher per
/// order; the decreases are stored as non-positive amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order_id: OrderId,
    pub total_price: Amount,
    pub ship_voucher_id: Option<VoucherId>,
    pub product_voucher_id: Option<VoucherId>,
    pub ship_voucher_decrease: Amount,
    pub product_voucher_decrease: Amount,
    pub address_id: AddressId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderDetail {
    pub order_id: OrderId,
    pub total_price: Amount,
    pub ship_voucher_decrease: Amount,
    pub product_voucher_decrease: Amount,
    pub address_id: AddressId,
}
