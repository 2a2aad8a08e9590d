use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use models::{NewProduct, Product, ProductId};

use super::types::{acquire, RepoResult};

/// Store of live product records; `get` yields the price/discount snapshot
/// the workflow copies into line items.
pub trait ProductsRepo: Send + Sync + 'static {
    fn create(&self, payload: NewProduct) -> RepoResult<Product>;
    fn get(&self, product_id: ProductId) -> RepoResult<Option<Product>>;
}

#[derive(Debug, Default)]
struct State {
    products: BTreeMap<i64, Product>,
    next_id: i64,
}

#[derive(Clone, Default)]
pub struct ProductsRepoImpl {
    state: Arc<Mutex<State>>,
}

impl ProductsRepoImpl {
    pub fn new() -> Self {
        ProductsRepoImpl::default()
    }
}

impl ProductsRepo for ProductsRepoImpl {
    fn create(&self, payload: NewProduct) -> RepoResult<Product> {
        let mut state = acquire(&self.state)?;
        state.next_id += 1;
        let product = Product {
            id: ProductId::new(state.next_id),
            name: payload.name,
            price: payload.price,
            discount: payload.discount,
        };
        state.products.insert(product.id.inner(), product.clone());
        Ok(product)
    }

    fn get(&self, product_id: ProductId) -> RepoResult<Option<Product>> {
        debug!("Getting product {}", product_id);
        let state = acquire(&self.state)?;
        Ok(state.products.get(&product_id.inner()).cloned())
    }
}
