use chrono::NaiveDateTime;

use models::{AuthenticatorId, OrderId};

/// Integrity seal of an order, captured immediately after the order is
/// persisted and never updated afterwards. `hash_order_info` is the hex
/// SHA-256 digest of the order's canonical info at creation time;
/// `signature` is the base64 compact secp256k1 signature over that digest
/// when signing material was configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSignature {
    pub order_id: OrderId,
    pub hash_order_info: String,
    pub signature: Option<String>,
    pub authenticator_id: Option<AuthenticatorId>,
    pub created_at: NaiveDateTime,
    pub version: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderSignature {
    pub order_id: OrderId,
    pub hash_order_info: String,
    pub signature: Option<String>,
    pub authenticator_id: Option<AuthenticatorId>,
    pub version: i32,
}
