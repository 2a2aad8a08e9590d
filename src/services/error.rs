use std::fmt;

use failure::{Backtrace, Context, Fail};
use serde_json;
use validator::ValidationErrors;

use repos::ErrorKind as RepoErrorKind;

#[derive(Debug)]
pub struct Error {
    inner: Context<ErrorKind>,
}

#[derive(Clone, Debug, Fail)]
pub enum ErrorKind {
    #[fail(display = "service error - internal")]
    Internal,
    #[fail(display = "service error - not found")]
    NotFound,
    #[fail(display = "service error - store failure")]
    PersistenceFailure,
    #[fail(display = "service error - violation of constraints: {}", _0)]
    Constraints(ValidationErrors),
    #[fail(display = "service error - invalid pricing input: {}", _0)]
    InvalidPricingInput(serde_json::Value),
    #[fail(display = "service error - invalid key material")]
    InvalidKeyMaterial,
}

derive_error_impls!();

impl From<RepoErrorKind> for ErrorKind {
    fn from(e: RepoErrorKind) -> Self {
        match e {
            RepoErrorKind::NotFound => ErrorKind::NotFound,
            RepoErrorKind::Constraints(errors) => ErrorKind::Constraints(errors),
            RepoErrorKind::Internal => ErrorKind::PersistenceFailure,
        }
    }
}
