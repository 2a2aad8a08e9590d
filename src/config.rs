//! Config module contains the top-level config for the app.

use config_crate::{Config as RawConfig, ConfigError, Environment, File};
use std::env;

use models::Currency;

/// Basic settings - cpu pool size, settlement currency and signing material
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub service: Service,
    pub signing: Signing,
}

/// Common service settings
#[derive(Debug, Deserialize, Clone)]
pub struct Service {
    pub thread_count: usize,
    pub currency: Currency,
}

/// Order sealing key material. When `secret_key` is absent orders are sealed
/// with a bare hash and verification degrades to digest comparison.
#[derive(Debug, Deserialize, Clone)]
pub struct Signing {
    pub secret_key: Option<String>,
    pub authenticator_id: Option<i64>,
}

/// Creates new app config struct
/// #Examples
/// ```ignore
/// use orders_lib::config::*;
///
/// let config = Config::new();
/// ```
impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        let mut s = RawConfig::new();
        s.merge(File::with_name("config/base"))?;

        // Note that this file is _optional_
        let env = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        s.merge(File::with_name(&format!("config/{}", env)).required(false))?;

        // Add in settings from the environment (with a prefix of ORDERS)
        s.merge(Environment::with_prefix("ORDERS"))?;

        s.try_into()
    }
}
