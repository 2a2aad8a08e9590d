use std::fmt::{self, Display};

use models::Amount;

#[derive(Clone, Copy, Debug, Display, Default, PartialEq, Eq, PartialOrd, Ord, From, FromStr, Hash, Serialize, Deserialize)]
pub struct VoucherId(i64);

impl VoucherId {
    pub fn new(id: i64) -> Self {
        VoucherId(id)
    }

    pub fn inner(&self) -> i64 {
        self.0
    }
}

/// What the voucher decrease applies to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VoucherTarget {
    Shipping,
    Product,
}

impl Display for VoucherTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VoucherTarget::Shipping => f.write_str("shipping"),
            VoucherTarget::Product => f.write_str("product"),
        }
    }
}

/// How the decrease is computed from the targeted base amount.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VoucherDiscount {
    Fixed(Amount),
    Percent(i32),
}

/// Redeemable voucher. `remaining_quantity` is the shared counter that racing
/// checkouts contend for; it is only ever decremented through the store under
/// a single lock, conditioned on being positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voucher {
    pub id: VoucherId,
    pub target: VoucherTarget,
    pub discount: VoucherDiscount,
    pub remaining_quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVoucher {
    pub target: VoucherTarget,
    pub discount: VoucherDiscount,
    pub remaining_quantity: i32,
}
