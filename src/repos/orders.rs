use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use models::{Amount, NewOrder, Order, OrderId, UserId};

use super::error::*;
use super::types::{acquire, RepoResult};

/// Store of order rows. Inserting assigns the order its final identifier;
/// that insert is the commit point of the creation workflow.
pub trait OrdersRepo: Send + Sync + 'static {
    fn create(&self, payload: NewOrder) -> RepoResult<Order>;
    fn get(&self, order_id: OrderId) -> RepoResult<Option<Order>>;
    fn count_by_user(&self, user_id: UserId) -> RepoResult<i64>;
    /// Returns the user's orders, newest first.
    fn get_page(&self, user_id: UserId, limit: i64, offset: i64) -> RepoResult<Vec<Order>>;
    fn set_total_price(&self, order_id: OrderId, total: Amount) -> RepoResult<Order>;
    fn delete(&self, order_id: OrderId) -> RepoResult<Option<Order>>;
}

#[derive(Debug, Default)]
struct State {
    orders: BTreeMap<i64, Order>,
    next_id: i64,
}

#[derive(Clone, Default)]
pub struct OrdersRepoImpl {
    state: Arc<Mutex<State>>,
}

impl OrdersRepoImpl {
    pub fn new() -> Self {
        OrdersRepoImpl::default()
    }

    /// Edits the delivery price of a stored order behind the seal's back.
    /// Exists only so integrity tests can simulate post-creation tampering
    /// with persisted order data.
    pub fn update_delivery_price(&self, order_id: OrderId, delivery_price: Amount) -> RepoResult<Order> {
        let mut state = acquire(&self.state)?;
        let order = state.orders.get_mut(&order_id.inner()).ok_or(ErrorKind::NotFound)?;
        order.delivery_price = delivery_price;
        Ok(order.clone())
    }
}

impl OrdersRepo for OrdersRepoImpl {
    fn create(&self, payload: NewOrder) -> RepoResult<Order> {
        debug!("Creating an order using payload: {:?}", payload);
        let mut state = acquire(&self.state)?;
        state.next_id += 1;
        let order = Order {
            id: OrderId::new(state.next_id),
            user_id: payload.user_id,
            status: payload.status,
            delivery_method: payload.delivery_method,
            delivery_price: payload.delivery_price,
            total_price: None,
            created_at: Utc::now().naive_utc(),
        };
        state.orders.insert(order.id.inner(), order.clone());
        Ok(order)
    }

    fn get(&self, order_id: OrderId) -> RepoResult<Option<Order>> {
        debug!("Getting an order with ID: {}", order_id);
        let state = acquire(&self.state)?;
        Ok(state.orders.get(&order_id.inner()).cloned())
    }

    fn count_by_user(&self, user_id: UserId) -> RepoResult<i64> {
        let state = acquire(&self.state)?;
        Ok(state.orders.values().filter(|order| order.user_id == user_id).count() as i64)
    }

    fn get_page(&self, user_id: UserId, limit: i64, offset: i64) -> RepoResult<Vec<Order>> {
        debug!("Getting orders of user {}, limit={}, offset={}", user_id, limit, offset);
        let state = acquire(&self.state)?;
        Ok(state
            .orders
            .values()
            .rev()
            .filter(|order| order.user_id == user_id)
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    fn set_total_price(&self, order_id: OrderId, total: Amount) -> RepoResult<Order> {
        debug!("Setting total price of order {} to {}", order_id, total);
        let mut state = acquire(&self.state)?;
        let order = state.orders.get_mut(&order_id.inner()).ok_or(ErrorKind::NotFound)?;
        order.total_price = Some(total);
        Ok(order.clone())
    }

    fn delete(&self, order_id: OrderId) -> RepoResult<Option<Order>> {
        debug!("Deleting an order with ID: {}", order_id);
        let mut state = acquire(&self.state)?;
        Ok(state.orders.remove(&order_id.inner()))
    }
}
