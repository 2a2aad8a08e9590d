use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use validator::{ValidationError, ValidationErrors};

use models::{NewOrderSignature, OrderId, OrderSignature};

use super::error::*;
use super::types::{acquire, RepoResult};

/// Append-only store of order integrity seals. A second insert for the same
/// order is a constraint violation: seals are created exactly once and never
/// updated.
pub trait OrderSignaturesRepo: Send + Sync + 'static {
    fn create(&self, payload: NewOrderSignature) -> RepoResult<OrderSignature>;
    fn get_by_order_id(&self, order_id: OrderId) -> RepoResult<Option<OrderSignature>>;
    fn delete_by_order_id(&self, order_id: OrderId) -> RepoResult<Option<OrderSignature>>;
}

#[derive(Debug, Default)]
struct State {
    signatures: BTreeMap<i64, OrderSignature>,
}

#[derive(Clone, Default)]
pub struct OrderSignaturesRepoImpl {
    state: Arc<Mutex<State>>,
}

impl OrderSignaturesRepoImpl {
    pub fn new() -> Self {
        OrderSignaturesRepoImpl::default()
    }
}

impl OrderSignaturesRepo for OrderSignaturesRepoImpl {
    fn create(&self, payload: NewOrderSignature) -> RepoResult<OrderSignature> {
        debug!("Sealing order {} with hash {}", payload.order_id, payload.hash_order_info);
        let mut state = acquire(&self.state)?;
        if state.signatures.contains_key(&payload.order_id.inner()) {
            let mut errors = ValidationErrors::new();
            let mut error = ValidationError::new("not unique");
            error.message = Some(format!("Order {} is already sealed", payload.order_id).into());
            errors.add("order_signature", error);
            return Err(ErrorKind::Constraints(errors).into());
        }
        let signature = OrderSignature {
            order_id: payload.order_id,
            hash_order_info: payload.hash_order_info,
            signature: payload.signature,
            authenticator_id: payload.authenticator_id,
            created_at: Utc::now().naive_utc(),
            version: payload.version,
        };
        state.signatures.insert(signature.order_id.inner(), signature.clone());
        Ok(signature)
    }

    fn get_by_order_id(&self, order_id: OrderId) -> RepoResult<Option<OrderSignature>> {
        debug!("Getting the seal of order {}", order_id);
        let state = acquire(&self.state)?;
        Ok(state.signatures.get(&order_id.inner()).cloned())
    }

    fn delete_by_order_id(&self, order_id: OrderId) -> RepoResult<Option<OrderSignature>> {
        debug!("Deleting the seal of order {}", order_id);
        let mut state = acquire(&self.state)?;
        Ok(state.signatures.remove(&order_id.inner()))
    }
}
