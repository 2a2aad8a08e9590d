use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use models::{CartItem, CartItemId, NewCartItem};

use super::types::{acquire, RepoResult};

/// Store of cart items awaiting checkout.
pub trait CartItemsRepo: Send + Sync + 'static {
    fn create(&self, payload: NewCartItem) -> RepoResult<CartItem>;
    fn get(&self, cart_item_id: CartItemId) -> RepoResult<Option<CartItem>>;
    fn delete(&self, cart_item_id: CartItemId) -> RepoResult<Option<CartItem>>;
    /// Puts a consumed cart item back, keeping its identifier. Used by the
    /// creation workflow's rollback.
    fn restore(&self, item: CartItem) -> RepoResult<()>;
}

#[derive(Debug, Default)]
struct State {
    items: BTreeMap<i64, CartItem>,
    next_id: i64,
}

#[derive(Clone, Default)]
pub struct CartItemsRepoImpl {
    state: Arc<Mutex<State>>,
}

impl CartItemsRepoImpl {
    pub fn new() -> Self {
        CartItemsRepoImpl::default()
    }
}

impl CartItemsRepo for CartItemsRepoImpl {
    fn create(&self, payload: NewCartItem) -> RepoResult<CartItem> {
        let mut state = acquire(&self.state)?;
        state.next_id += 1;
        let item = CartItem {
            id: CartItemId::new(state.next_id),
            user_id: payload.user_id,
            product_id: payload.product_id,
            quantity: payload.quantity,
        };
        state.items.insert(item.id.inner(), item.clone());
        Ok(item)
    }

    fn get(&self, cart_item_id: CartItemId) -> RepoResult<Option<CartItem>> {
        debug!("Getting cart item {}", cart_item_id);
        let state = acquire(&self.state)?;
        Ok(state.items.get(&cart_item_id.inner()).cloned())
    }

    fn delete(&self, cart_item_id: CartItemId) -> RepoResult<Option<CartItem>> {
        debug!("Deleting cart item {}", cart_item_id);
        let mut state = acquire(&self.state)?;
        Ok(state.items.remove(&cart_item_id.inner()))
    }

    fn restore(&self, item: CartItem) -> RepoResult<()> {
        debug!("Restoring cart item {}", item.id);
        let mut state = acquire(&self.state)?;
        state.items.insert(item.id.inner(), item);
        Ok(())
    }
}
