//! Models contains all structures that are used in different
//! modules of the app

pub mod amount;
pub mod authenticator;
pub mod cart;
pub mod currency;
pub mod order;
pub mod order_detail;
pub mod order_item;
pub mod product;
pub mod signature;
pub mod user;
pub mod voucher;

pub use self::amount::*;
pub use self::authenticator::*;
pub use self::cart::*;
pub use self::currency::*;
pub use self::order::*;
pub use self::order_detail::*;
pub use self::order_item::*;
pub use self::product::*;
pub use self::signature::*;
pub use self::user::*;
pub use self::voucher::*;
