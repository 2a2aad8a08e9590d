#[derive(Clone, Copy, Debug, Display, Default, PartialEq, Eq, PartialOrd, Ord, From, FromStr, Hash, Serialize, Deserialize)]
pub struct AuthenticatorId(i64);

impl AuthenticatorId {
    pub fn new(id: i64) -> Self {
        AuthenticatorId(id)
    }

    pub fn inner(&self) -> i64 {
        self.0
    }
}

/// Key-pair identity referenced by order seals. Only the hex-encoded public
/// key is stored here; the matching secret key lives in configuration and is
/// managed externally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Authenticator {
    pub id: AuthenticatorId,
    pub public_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuthenticator {
    pub public_key: String,
}
