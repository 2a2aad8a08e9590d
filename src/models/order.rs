use std::fmt::{self, Display};

use chrono::NaiveDateTime;

use models::{Amount, UserId};

#[derive(Clone, Copy, Debug, Display, Default, PartialEq, Eq, PartialOrd, Ord, From, FromStr, Hash, Serialize, Deserialize)]
pub struct OrderId(i64);

impl OrderId {
    pub fn new(id: i64) -> Self {
        OrderId(id)
    }

    pub fn inner(&self) -> i64 {
        self.0
    }
}

/// Lifecycle state of an order. The wire representation is the numeric code
/// used by the legacy storefront, with `Pending` being `-1`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn code(&self) -> i32 {
        match self {
            OrderStatus::Pending => -1,
            OrderStatus::Confirmed => 0,
            OrderStatus::Shipped => 1,
            OrderStatus::Delivered => 2,
            OrderStatus::Cancelled => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<OrderStatus> {
        match code {
            -1 => Some(OrderStatus::Pending),
            0 => Some(OrderStatus::Confirmed),
            1 => Some(OrderStatus::Shipped),
            2 => Some(OrderStatus::Delivered),
            3 => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OrderStatus::Pending => f.write_str("pending"),
            OrderStatus::Confirmed => f.write_str("confirmed"),
            OrderStatus::Shipped => f.write_str("shipped"),
            OrderStatus::Delivered => f.write_str("delivered"),
            OrderStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Persisted order row. `total_price` is derived by the pricing service once
/// line items and voucher decreases are known; until then it is `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub delivery_method: i32,
    pub delivery_price: Amount,
    pub total_price: Option<Amount>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub status: OrderStatus,
    pub delivery_method: i32,
    pub delivery_price: Amount,
}
