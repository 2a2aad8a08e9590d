use std::sync::{Mutex, MutexGuard};

use failure::Fail;

use repos::{Error, ErrorKind, ErrorSource};

pub type RepoResult<T> = Result<T, Error>;

/// Locks an in-memory store's state. A poisoned lock means a writer panicked
/// mid-update, so the state cannot be trusted any more.
pub fn acquire<'a, T>(mutex: &'a Mutex<T>) -> RepoResult<MutexGuard<'a, T>> {
    mutex.lock().map_err(|_| {
        let e = format_err!("storage lock poisoned");
        ectx!(err e, ErrorSource::Lock, ErrorKind::Internal)
    })
}
