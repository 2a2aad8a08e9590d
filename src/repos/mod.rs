//! Repos is a module responsible for the storage collaborators the order
//! pipeline consumes. The traits are the narrow interfaces the services see;
//! the `*Impl` types are in-memory implementations backing them.

pub mod authenticators;
pub mod carts;
pub mod error;
pub mod order_details;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod signatures;
pub mod types;
pub mod vouchers;

pub use self::authenticators::*;
pub use self::carts::*;
pub use self::error::*;
pub use self::order_details::*;
pub use self::order_items::*;
pub use self::orders::*;
pub use self::products::*;
pub use self::signatures::*;
pub use self::types::*;
pub use self::vouchers::*;
