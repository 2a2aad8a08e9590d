//! Services is a core layer for the business logic of the order pipeline:
//! price aggregation, content fingerprinting, seal signing, integrity
//! verification and the order creation workflow itself.

pub mod error;
pub mod fingerprint;
pub mod order;
pub mod pricing;
pub mod signature;
pub mod types;
pub mod verification;

pub use self::error::{Error, ErrorKind};
pub use self::order::*;
pub use self::signature::{SignatureService, SigningKey};
pub use self::types::*;
pub use self::verification::*;

use std::sync::Arc;

use futures_cpupool::CpuPool;

use config::Config;
use models::Currency;
use repos::{
    AuthenticatorsRepo, AuthenticatorsRepoImpl, CartItemsRepo, CartItemsRepoImpl, OrderDetailsRepo,
    OrderDetailsRepoImpl, OrderItemsRepo, OrderItemsRepoImpl, OrderSignaturesRepo,
    OrderSignaturesRepoImpl, OrdersRepo, OrdersRepoImpl, ProductsRepo, ProductsRepoImpl,
    VouchersRepo, VouchersRepoImpl,
};

#[derive(Clone)]
pub struct Service {
    pub cpu_pool: CpuPool,
    pub orders_repo: Arc<OrdersRepo>,
    pub order_items_repo: Arc<OrderItemsRepo>,
    pub order_details_repo: Arc<OrderDetailsRepo>,
    pub order_signatures_repo: Arc<OrderSignaturesRepo>,
    pub authenticators_repo: Arc<AuthenticatorsRepo>,
    pub vouchers_repo: Arc<VouchersRepo>,
    pub cart_items_repo: Arc<CartItemsRepo>,
    pub products_repo: Arc<ProductsRepo>,
    pub signature_service: SignatureService,
    pub signing: Option<SigningKey>,
    pub currency: Currency,
}

impl Service {
    /// Builds a service over fresh in-memory stores from the app config.
    pub fn create_from_config(config: &Config) -> Result<Service, Error> {
        let signing = SigningKey::from_config(&config.signing)?;
        Ok(Service {
            cpu_pool: CpuPool::new(config.service.thread_count),
            orders_repo: Arc::new(OrdersRepoImpl::new()),
            order_items_repo: Arc::new(OrderItemsRepoImpl::new()),
            order_details_repo: Arc::new(OrderDetailsRepoImpl::new()),
            order_signatures_repo: Arc::new(OrderSignaturesRepoImpl::new()),
            authenticators_repo: Arc::new(AuthenticatorsRepoImpl::new()),
            vouchers_repo: Arc::new(VouchersRepoImpl::new()),
            cart_items_repo: Arc::new(CartItemsRepoImpl::new()),
            products_repo: Arc::new(ProductsRepoImpl::new()),
            signature_service: SignatureService::new(),
            signing,
            currency: config.service.currency,
        })
    }

    pub fn verifier(&self) -> IntegrityVerifier {
        IntegrityVerifier::new(
            self.order_signatures_repo.clone(),
            self.authenticators_repo.clone(),
            self.signature_service,
        )
    }
}
