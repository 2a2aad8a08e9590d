use models::Amount;

#[derive(Clone, Copy, Debug, Display, Default, PartialEq, Eq, PartialOrd, Ord, From, FromStr, Hash, Serialize, Deserialize)]
pub struct ProductId(i64);

impl ProductId {
    pub fn new(id: i64) -> Self {
        ProductId(id)
    }

    pub fn inner(&self) -> i64 {
        self.0
    }
}

/// Live product record. `price` and `discount` are the current values that
/// get snapshotted into line items at purchase time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Amount,
    pub discount: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Amount,
    pub discount: i32,
}
