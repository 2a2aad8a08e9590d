//! Order service: the checkout workflow turning cart items into a sealed
//! order, and the paginated summary surface with tamper annotations.

use bigdecimal::BigDecimal;
use failure::Fail;
use validator::Validate;

use models::{
    AddressId, Amount, CartItem, CartItemId, NewOrder, NewOrderDetail, NewOrderItem,
    NewOrderSignature, Order, OrderId, OrderStatus, PricedItem, Product, UserId, VoucherId,
    VoucherTarget,
};

use super::error::{Error, ErrorKind};
use super::types::{spawn_on_pool, ServiceFuture};
use super::verification::AttestationLevel;
use super::{fingerprint, pricing, Service};

pub const ORDERS_PER_PAGE: i64 = 3;
pub const SEAL_VERSION: i32 = 1;

const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreateOrderPayload {
    pub user_id: UserId,
    pub cart_item_ids: Vec<CartItemId>,
    pub delivery_method: i32,
    pub delivery_price: Amount,
    pub address_id: AddressId,
    pub ship_voucher_id: Option<VoucherId>,
    pub product_voucher_id: Option<VoucherId>,
}

/// One row of the order history page.
#[derive(Clone, Debug, Serialize)]
pub struct OrderSummary {
    pub id: OrderId,
    pub created_at: String,
    pub short_description: String,
    pub status: OrderStatus,
    pub total_with_delivery: BigDecimal,
    pub tampered: bool,
    pub attestation: Option<AttestationLevel>,
}

#[derive(Clone, Debug, Serialize)]
pub struct OrdersPage {
    pub page: i64,
    pub total_pages: i64,
    pub orders: Vec<OrderSummary>,
}

pub trait OrderService {
    /// Converts the selected cart items into a priced, sealed order. Atomic:
    /// either the full set of records exists afterwards or none of it does.
    fn create_order(&self, payload: CreateOrderPayload) -> ServiceFuture<Order>;
    /// One page of the user's order history, newest first, each order
    /// annotated with its integrity verdict. `page` is the raw query
    /// parameter; anything unparseable or out of range falls back to page 1.
    fn get_orders_page(&self, user_id: UserId, page: Option<String>) -> ServiceFuture<OrdersPage>;
}

impl OrderService for Service {
    fn create_order(&self, payload: CreateOrderPayload) -> ServiceFuture<Order> {
        let service = self.clone();
        spawn_on_pool(&self.cpu_pool, move || service.create_order_sync(payload))
    }

    fn get_orders_page(&self, user_id: UserId, page: Option<String>) -> ServiceFuture<OrdersPage> {
        let service = self.clone();
        spawn_on_pool(&self.cpu_pool, move || service.get_orders_page_sync(user_id, page))
    }
}

impl Service {
    fn create_order_sync(&self, payload: CreateOrderPayload) -> Result<Order, Error> {
        info!(
            "Creating an order for user {} from {} cart items",
            payload.user_id,
            payload.cart_item_ids.len()
        );
        if payload.cart_item_ids.is_empty() {
            return Err(pricing::violation("cart", "cart selection is empty"));
        }

        // Resolve the selection and snapshot current product data. A missing
        // cart item or product aborts before anything is written.
        let mut cart_items = Vec::with_capacity(payload.cart_item_ids.len());
        let mut selection = Vec::with_capacity(payload.cart_item_ids.len());
        for cart_item_id in &payload.cart_item_ids {
            let cart_item_id = *cart_item_id;
            let cart_item = self
                .cart_items_repo
                .get(cart_item_id)
                .map_err(ectx!(try convert))?
                .ok_or({
                    let e = format_err!("Cart item {} not found", cart_item_id);
                    ectx!(try err e, ErrorKind::NotFound)
                })?;
            let product = self
                .products_repo
                .get(cart_item.product_id)
                .map_err(ectx!(try convert))?
                .ok_or({
                    let e = format_err!("Product {} not found", cart_item.product_id);
                    ectx!(try err e, ErrorKind::NotFound)
                })?;
            selection.push((product, cart_item.quantity));
            cart_items.push(cart_item);
        }

        let priced: Vec<PricedItem> = selection
            .iter()
            .map(|(product, quantity)| PricedItem {
                price: product.price,
                discount: product.discount,
                quantity: *quantity,
            })
            .collect();
        pricing::check_items(&priced)?;

        let ship_decrease = self.voucher_decrease(
            payload.ship_voucher_id,
            VoucherTarget::Shipping,
            &priced,
            payload.delivery_price,
        )?;
        let product_decrease = self.voucher_decrease(
            payload.product_voucher_id,
            VoucherTarget::Product,
            &priced,
            payload.delivery_price,
        )?;

        // Inserting the order assigns its id; this is the commit point. Any
        // failure past it rolls the already written records back.
        let order = self
            .orders_repo
            .create(NewOrder {
                user_id: payload.user_id,
                status: OrderStatus::Pending,
                delivery_method: payload.delivery_method,
                delivery_price: payload.delivery_price,
            })
            .map_err(ectx!(try convert))?;

        let mut redeemed = Vec::new();
        let mut consumed = Vec::new();
        match self.finish_order(
            &order,
            selection,
            cart_items,
            &priced,
            ship_decrease,
            product_decrease,
            &payload,
            &mut redeemed,
            &mut consumed,
        ) {
            Ok(order) => {
                info!("Order {} created and sealed", order.id);
                Ok(order)
            }
            Err(e) => {
                warn!("Creation of order {} failed, rolling back: {}", order.id, e);
                self.rollback_order(order.id, &redeemed, consumed);
                Err(e)
            }
        }
    }

    /// Negated decrease the voucher contributes, or zero when no voucher was
    /// selected. The voucher must target the slot it was passed in.
    fn voucher_decrease(
        &self,
        voucher_id: Option<VoucherId>,
        target: VoucherTarget,
        items: &[PricedItem],
        shipping: Amount,
    ) -> Result<Amount, Error> {
        let voucher_id = match voucher_id {
            Some(voucher_id) => voucher_id,
            None => return Ok(Amount::zero()),
        };
        let voucher = self
            .vouchers_repo
            .get(voucher_id)
            .map_err(ectx!(try convert))?
            .ok_or({
                let e = format_err!("Voucher {} not found", voucher_id);
                ectx!(try err e, ErrorKind::NotFound)
            })?;
        if voucher.target != target {
            return Err(pricing::violation("voucher", "voucher does not apply to this slot"));
        }
        let decrease = self
            .vouchers_repo
            .calculate_decrease(voucher_id, items, shipping)
            .map_err(ectx!(try convert))?;
        decrease.checked_neg().ok_or({
            let e = format_err!("Decrease of voucher {} cannot be negated", voucher_id);
            ectx!(err e, ErrorKind::Internal)
        })
    }

    fn finish_order(
        &self,
        order: &Order,
        selection: Vec<(Product, i32)>,
        cart_items: Vec<CartItem>,
        priced: &[PricedItem],
        ship_decrease: Amount,
        product_decrease: Amount,
        payload: &CreateOrderPayload,
        redeemed: &mut Vec<VoucherId>,
        consumed: &mut Vec<CartItem>,
    ) -> Result<Order, Error> {
        let mut items = Vec::with_capacity(selection.len());
        for (product, quantity) in selection {
            let new_item = NewOrderItem {
                order_id: order.id,
                product_id: product.id,
                product_name: product.name,
                price: product.price,
                discount: product.discount,
                quantity,
            };
            new_item.validate().map_err(|e| {
                Error::from(ErrorKind::InvalidPricingInput(
                    ::serde_json::to_value(&e).unwrap_or_default(),
                ))
            })?;
            items.push(self.order_items_repo.create(new_item).map_err(ectx!(try convert))?);
        }

        let total = pricing::compute_total(priced, order.delivery_price, &[ship_decrease, product_decrease])?;
        let order = self
            .orders_repo
            .set_total_price(order.id, total)
            .map_err(ectx!(try convert))?;

        let mut detail = self
            .order_details_repo
            .create(NewOrderDetail {
                order_id: order.id,
                total_price: total,
                ship_voucher_decrease: ship_decrease,
                product_voucher_decrease: product_decrease,
                address_id: payload.address_id,
            })
            .map_err(ectx!(try convert))?;

        if let Some(voucher_id) = payload.ship_voucher_id {
            detail = self
                .order_details_repo
                .set_voucher(VoucherTarget::Shipping, voucher_id, order.id)
                .map_err(ectx!(try convert))?;
            self.vouchers_repo.decrease_quantity(voucher_id).map_err(ectx!(try convert))?;
            redeemed.push(voucher_id);
        }
        if let Some(voucher_id) = payload.product_voucher_id {
            detail = self
                .order_details_repo
                .set_voucher(VoucherTarget::Product, voucher_id, order.id)
                .map_err(ectx!(try convert))?;
            self.vouchers_repo.decrease_quantity(voucher_id).map_err(ectx!(try convert))?;
            redeemed.push(voucher_id);
        }

        for cart_item in cart_items {
            if let Some(removed) = self.cart_items_repo.delete(cart_item.id).map_err(ectx!(try convert))? {
                consumed.push(removed);
            }
        }

        let digest = fingerprint::hash(&fingerprint::canonicalize(&order, &items, Some(&detail)));
        let (signature, authenticator_id) = match self.signing.as_ref() {
            Some(signing) => (
                Some(self.signature_service.sign(&digest, &signing.secret_key)?),
                Some(signing.authenticator_id),
            ),
            None => (None, None),
        };
        self.order_signatures_repo
            .create(NewOrderSignature {
                order_id: order.id,
                hash_order_info: digest,
                signature,
                authenticator_id,
                version: SEAL_VERSION,
            })
            .map_err(ectx!(try convert))?;

        Ok(order)
    }

    /// Compensates everything `finish_order` managed to write. Secondary
    /// failures here are logged and skipped so the rest of the cleanup still
    /// runs.
    fn rollback_order(&self, order_id: OrderId, redeemed: &[VoucherId], consumed: Vec<CartItem>) {
        if let Err(e) = self.order_signatures_repo.delete_by_order_id(order_id) {
            warn!("Rollback of order {} could not delete the seal: {}", order_id, e);
        }
        if let Err(e) = self.order_details_repo.delete_by_order_id(order_id) {
            warn!("Rollback of order {} could not delete the detail: {}", order_id, e);
        }
        if let Err(e) = self.order_items_repo.delete_by_order_id(order_id) {
            warn!("Rollback of order {} could not delete its items: {}", order_id, e);
        }
        if let Err(e) = self.orders_repo.delete(order_id) {
            warn!("Rollback of order {} could not delete the order: {}", order_id, e);
        }
        for voucher_id in redeemed {
            if let Err(e) = self.vouchers_repo.increase_quantity(*voucher_id) {
                warn!("Rollback of order {} could not restore voucher {}: {}", order_id, voucher_id, e);
            }
        }
        for cart_item in consumed {
            let cart_item_id = cart_item.id;
            if let Err(e) = self.cart_items_repo.restore(cart_item) {
                warn!(
                    "Rollback of order {} could not restore cart item {}: {}",
                    order_id, cart_item_id, e
                );
            }
        }
    }

    fn get_orders_page_sync(&self, user_id: UserId, page: Option<String>) -> Result<OrdersPage, Error> {
        let total_orders = self.orders_repo.count_by_user(user_id).map_err(ectx!(try convert))?;
        let mut total_pages = total_orders / ORDERS_PER_PAGE;
        if total_orders % ORDERS_PER_PAGE != 0 {
            total_pages += 1;
        }
        let page = resolve_page(page.as_ref().map(|s| s.as_str()), total_pages);
        let offset = (page - 1) * ORDERS_PER_PAGE;

        let orders = self
            .orders_repo
            .get_page(user_id, ORDERS_PER_PAGE, offset)
            .map_err(ectx!(try convert))?;
        let verifier = self.verifier();

        let mut summaries = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.order_items_repo.get_by_order_id(order.id).map_err(ectx!(try convert))?;
            let detail = self
                .order_details_repo
                .get_by_order_id(order.id)
                .map_err(ectx!(try convert))?;

            // The displayed total is recomputed from the stored rows, never
            // read back from the order. Stored data tampered into invalid
            // pricing must not fail the page; the verifier flags it and the
            // stored total is shown instead.
            let priced: Vec<PricedItem> = items.iter().map(PricedItem::from).collect();
            let decreases = detail
                .as_ref()
                .map(|detail| vec![detail.ship_voucher_decrease, detail.product_voucher_decrease])
                .unwrap_or_default();
            let total = match pricing::compute_total(&priced, order.delivery_price, &decreases) {
                Ok(total) => total,
                Err(e) => {
                    warn!(
                        "Total of order {} cannot be recomputed, falling back to the stored total: {}",
                        order.id, e
                    );
                    detail
                        .as_ref()
                        .map(|detail| detail.total_price)
                        .or(order.total_price)
                        .unwrap_or_else(Amount::zero)
                }
            };

            let outcome = verifier.verify_order(&order, &items, detail.as_ref());
            let names = self
                .order_items_repo
                .product_names_by_order_id(order.id)
                .map_err(ectx!(try convert))?;

            summaries.push(OrderSummary {
                id: order.id,
                created_at: order.created_at.format(DATE_FORMAT).to_string(),
                short_description: short_description(&names),
                status: order.status,
                total_with_delivery: total.to_super_unit(self.currency),
                tampered: outcome.is_tampered(),
                attestation: outcome.attestation(),
            });
        }

        Ok(OrdersPage {
            page,
            total_pages,
            orders: summaries,
        })
    }
}

/// Resolves the raw page parameter. Unparseable values and pages outside
/// `[1, total_pages]` fall back to the first page.
fn resolve_page(raw: Option<&str>, total_pages: i64) -> i64 {
    let page = raw.and_then(|raw| raw.parse::<i64>().ok()).unwrap_or(1);
    if page < 1 || page > total_pages {
        1
    } else {
        page
    }
}

/// "kettle", or "kettle and 2 more" for multi-item orders.
fn short_description(product_names: &[String]) -> String {
    match product_names.len() {
        0 => String::new(),
        1 => product_names[0].clone(),
        n => format!("{} and {} more", product_names[0], n - 1),
    }
}
