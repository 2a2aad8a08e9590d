use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use models::{Amount, NewOrderItem, OrderId, OrderItem, OrderItemId, ProductId};

use super::error::*;
use super::types::{acquire, RepoResult};

/// Store of order line items. Items are insert-only snapshots; the read side
/// returns them in insertion order so canonicalization is stable.
pub trait OrderItemsRepo: Send + Sync + 'static {
    fn create(&self, payload: NewOrderItem) -> RepoResult<OrderItem>;
    fn get_by_order_id(&self, order_id: OrderId) -> RepoResult<Vec<OrderItem>>;
    fn product_names_by_order_id(&self, order_id: OrderId) -> RepoResult<Vec<String>>;
    fn delete_by_order_id(&self, order_id: OrderId) -> RepoResult<()>;
}

#[derive(Debug, Default)]
struct State {
    items: BTreeMap<i64, OrderItem>,
    next_id: i64,
}

#[derive(Clone, Default)]
pub struct OrderItemsRepoImpl {
    state: Arc<Mutex<State>>,
}

impl OrderItemsRepoImpl {
    pub fn new() -> Self {
        OrderItemsRepoImpl::default()
    }

    /// Edits a snapshotted price behind the seal's back; integrity tests use
    /// it to simulate tampering with stored line items.
    pub fn update_price(&self, order_id: OrderId, product_id: ProductId, price: Amount) -> RepoResult<OrderItem> {
        let mut state = acquire(&self.state)?;
        let item = state
            .items
            .values_mut()
            .find(|item| item.order_id == order_id && item.product_id == product_id)
            .ok_or(ErrorKind::NotFound)?;
        item.price = price;
        Ok(item.clone())
    }
}

impl OrderItemsRepo for OrderItemsRepoImpl {
    fn create(&self, payload: NewOrderItem) -> RepoResult<OrderItem> {
        debug!("Creating an order item using payload: {:?}", payload);
        let mut state = acquire(&self.state)?;
        state.next_id += 1;
        let item = OrderItem {
            id: OrderItemId::new(state.next_id),
            order_id: payload.order_id,
            product_id: payload.product_id,
            product_name: payload.product_name,
            price: payload.price,
            discount: payload.discount,
            quantity: payload.quantity,
            created_at: Utc::now().naive_utc(),
        };
        state.items.insert(item.id.inner(), item.clone());
        Ok(item)
    }

    fn get_by_order_id(&self, order_id: OrderId) -> RepoResult<Vec<OrderItem>> {
        debug!("Getting items of order {}", order_id);
        let state = acquire(&self.state)?;
        Ok(state.items.values().filter(|item| item.order_id == order_id).cloned().collect())
    }

    fn product_names_by_order_id(&self, order_id: OrderId) -> RepoResult<Vec<String>> {
        let state = acquire(&self.state)?;
        Ok(state
            .items
            .values()
            .filter(|item| item.order_id == order_id)
            .map(|item| item.product_name.clone())
            .collect())
    }

    fn delete_by_order_id(&self, order_id: OrderId) -> RepoResult<()> {
        debug!("Deleting items of order {}", order_id);
        let mut state = acquire(&self.state)?;
        state.items.retain(|_, item| item.order_id != order_id);
        Ok(())
    }
}
