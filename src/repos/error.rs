use std::fmt;

use failure::{Backtrace, Context, Fail};
use validator::ValidationErrors;

#[derive(Debug)]
pub struct Error {
    inner: Context<ErrorKind>,
}

#[derive(Clone, Debug, Fail)]
pub enum ErrorKind {
    #[fail(display = "repo error - violation of constraints: {}", _0)]
    Constraints(ValidationErrors),
    #[fail(display = "repo error - internal")]
    Internal,
    #[fail(display = "repo error - not found")]
    NotFound,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Fail)]
pub enum ErrorSource {
    #[fail(display = "repo source - storage lock")]
    Lock,
}

derive_error_impls!();
