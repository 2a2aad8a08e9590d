//! Orders is a service responsible for turning a selected cart into a priced,
//! immutable order record and for detecting after-the-fact tampering with
//! stored orders. The layered structure of the app is
//!
//! `Service -> Repo`
//!
//! Each layer can only face exceptions in its base layers and can only expose
//! its own errors. E.g. `Service` layer will only deal with `Repo` errors and
//! will only return `ServiceError`.
//!
//! Every order is sealed at creation time with a SHA-256 hash of its
//! canonical textual representation, optionally signed with a secp256k1 key.
//! At read time the seal is re-checked: signature verification when the
//! signer's public key is resolvable, plain digest comparison otherwise.

extern crate base64;
extern crate bigdecimal;
extern crate chrono;
extern crate config as config_crate;
#[macro_use]
extern crate derive_more;
#[macro_use]
extern crate failure;
extern crate futures;
extern crate futures_cpupool;
extern crate hex;
#[macro_use]
extern crate log;
extern crate secp256k1;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate sha2;
extern crate validator;
#[macro_use]
extern crate validator_derive;

#[macro_use]
pub mod macros;
pub mod config;
pub mod models;
pub mod repos;
pub mod services;
