//! Error plumbing macros shared by all layers.
//!
//! Each layer defines `Error { inner: Context<ErrorKind> }` plus an
//! `ErrorKind` enum and calls `derive_error_impls!()` to get the boilerplate.
//! `ectx!` attaches an `ErrorKind` (and optionally an `ErrorSource`) to an
//! underlying failure and wraps it into the calling layer's `Error`.

/// Generates `Fail`, `Display`, `kind()` and `From` impls for a layer `Error`
/// wrapping `Context<ErrorKind>`. Expects `Error`, `ErrorKind`, `Backtrace`,
/// `Context`, `Fail` and `fmt` to be in scope.
macro_rules! derive_error_impls {
    () => {
        #[allow(dead_code)]
        impl Error {
            pub fn kind(&self) -> ErrorKind {
                self.inner.get_context().clone()
            }
        }

        impl Fail for Error {
            fn cause(&self) -> Option<&Fail> {
                self.inner.cause()
            }

            fn backtrace(&self) -> Option<&Backtrace> {
                self.inner.backtrace()
            }
        }

        impl fmt::Display for Error {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                fmt::Display::fmt(&self.inner, f)
            }
        }

        impl From<ErrorKind> for Error {
            fn from(kind: ErrorKind) -> Error {
                Error {
                    inner: Context::new(kind),
                }
            }
        }

        impl From<Context<ErrorKind>> for Error {
            fn from(inner: Context<ErrorKind>) -> Error {
                Error { inner }
            }
        }
    };
}

/// Builds the calling layer's `Error` from a cause.
///
/// Forms:
/// - `ectx!(err cause, kind)` / `ectx!(err cause, source, kind)` - in place;
/// - `ectx!(kind)` / `ectx!(source, kind)` - closure for `map_err`;
/// - `ectx!(convert)` - closure converting a lower-layer error into this
///   layer's `Error`, mapping its kind through `ErrorKind::from`.
///
/// The `try` marker is accepted everywhere for call sites that bail out with
/// `?` right away; it expands to the same code.
macro_rules! ectx {
    (try err $e:expr, $source:expr, $kind:expr) => {
        ectx!(err $e, $source, $kind)
    };
    (try err $e:expr, $kind:expr) => {
        ectx!(err $e, $kind)
    };
    (try convert) => {
        ectx!(convert)
    };
    (try $source:expr, $kind:expr) => {
        ectx!($source, $kind)
    };
    (try $kind:expr) => {
        ectx!($kind)
    };
    (err $e:expr, $source:expr, $kind:expr) => {
        Error::from($e.context($source).context($kind))
    };
    (err $e:expr, $kind:expr) => {
        Error::from($e.context($kind))
    };
    (convert) => {
        move |e| {
            let kind = ErrorKind::from(e.kind());
            Error::from(e.context(kind))
        }
    };
    ($source:expr, $kind:expr) => {
        move |e| Error::from(e.context($source).context($kind))
    };
    ($kind:expr) => {
        move |e| Error::from(e.context($kind))
    };
}
