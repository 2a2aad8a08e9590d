use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use models::{NewOrderDetail, OrderDetail, OrderId, VoucherId, VoucherTarget};

use super::error::*;
use super::types::{acquire, RepoResult};

/// Store of order pricing breakdowns, one per order.
pub trait OrderDetailsRepo: Send + Sync + 'static {
    fn create(&self, payload: NewOrderDetail) -> RepoResult<OrderDetail>;
    fn get_by_order_id(&self, order_id: OrderId) -> RepoResult<Option<OrderDetail>>;
    fn set_voucher(&self, target: VoucherTarget, voucher_id: VoucherId, order_id: OrderId) -> RepoResult<OrderDetail>;
    fn delete_by_order_id(&self, order_id: OrderId) -> RepoResult<Option<OrderDetail>>;
}

#[derive(Debug, Default)]
struct State {
    details: BTreeMap<i64, OrderDetail>,
}

#[derive(Clone, Default)]
pub struct OrderDetailsRepoImpl {
    state: Arc<Mutex<State>>,
}

impl OrderDetailsRepoImpl {
    pub fn new() -> Self {
        OrderDetailsRepoImpl::default()
    }
}

impl OrderDetailsRepo for OrderDetailsRepoImpl {
    fn create(&self, payload: NewOrderDetail) -> RepoResult<OrderDetail> {
        debug!("Creating an order detail using payload: {:?}", payload);
        let mut state = acquire(&self.state)?;
        let detail = OrderDetail {
            order_id: payload.order_id,
            total_price: payload.total_price,
            ship_voucher_id: None,
            product_voucher_id: None,
            ship_voucher_decrease: payload.ship_voucher_decrease,
            product_voucher_decrease: payload.product_voucher_decrease,
            address_id: payload.address_id,
        };
        state.details.insert(detail.order_id.inner(), detail.clone());
        Ok(detail)
    }

    fn get_by_order_id(&self, order_id: OrderId) -> RepoResult<Option<OrderDetail>> {
        debug!("Getting the detail of order {}", order_id);
        let state = acquire(&self.state)?;
        Ok(state.details.get(&order_id.inner()).cloned())
    }

    fn set_voucher(&self, target: VoucherTarget, voucher_id: VoucherId, order_id: OrderId) -> RepoResult<OrderDetail> {
        debug!("Associating {} voucher {} with order {}", target, voucher_id, order_id);
        let mut state = acquire(&self.state)?;
        let detail = state.details.get_mut(&order_id.inner()).ok_or(ErrorKind::NotFound)?;
        match target {
            VoucherTarget::Shipping => detail.ship_voucher_id = Some(voucher_id),
            VoucherTarget::Product => detail.product_voucher_id = Some(voucher_id),
        }
        Ok(detail.clone())
    }

    fn delete_by_order_id(&self, order_id: OrderId) -> RepoResult<Option<OrderDetail>> {
        debug!("Deleting the detail of order {}", order_id);
        let mut state = acquire(&self.state)?;
        Ok(state.details.remove(&order_id.inner()))
    }
}
