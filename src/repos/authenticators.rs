use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use models::{Authenticator, AuthenticatorId, NewAuthenticator};

use super::types::{acquire, RepoResult};

/// Store of key-pair identities; provides the public key material used to
/// verify order seals.
pub trait AuthenticatorsRepo: Send + Sync + 'static {
    fn create(&self, payload: NewAuthenticator) -> RepoResult<Authenticator>;
    fn get(&self, authenticator_id: AuthenticatorId) -> RepoResult<Option<Authenticator>>;
}

#[derive(Debug, Default)]
struct State {
    authenticators: BTreeMap<i64, Authenticator>,
    next_id: i64,
}

#[derive(Clone, Default)]
pub struct AuthenticatorsRepoImpl {
    state: Arc<Mutex<State>>,
}

impl AuthenticatorsRepoImpl {
    pub fn new() -> Self {
        AuthenticatorsRepoImpl::default()
    }
}

impl AuthenticatorsRepo for AuthenticatorsRepoImpl {
    fn create(&self, payload: NewAuthenticator) -> RepoResult<Authenticator> {
        let mut state = acquire(&self.state)?;
        state.next_id += 1;
        let authenticator = Authenticator {
            id: AuthenticatorId::new(state.next_id),
            public_key: payload.public_key,
        };
        state.authenticators.insert(authenticator.id.inner(), authenticator.clone());
        Ok(authenticator)
    }

    fn get(&self, authenticator_id: AuthenticatorId) -> RepoResult<Option<Authenticator>> {
        debug!("Getting authenticator {}", authenticator_id);
        let state = acquire(&self.state)?;
        Ok(state.authenticators.get(&authenticator_id.inner()).cloned())
    }
}
