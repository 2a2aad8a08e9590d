//! Signing and verification of order digests with secp256k1 key pairs.
//! Digests travel hex-encoded, signatures base64-encoded in compact form.

use std::str::FromStr;

use base64;
use failure::Fail;
use hex;
use secp256k1::key::{PublicKey, SecretKey};
use secp256k1::{Message, Secp256k1, Signature};

use config;
use models::AuthenticatorId;

use super::error::{Error, ErrorKind};

#[derive(Clone, Copy, Debug, Default)]
pub struct SignatureService;

impl SignatureService {
    pub fn new() -> Self {
        SignatureService
    }

    /// Parses hex-encoded public key material. Empty or malformed material is
    /// an `InvalidKeyMaterial` error, never a silent pass.
    pub fn load_public_key(&self, raw: &str) -> Result<PublicKey, Error> {
        if raw.is_empty() {
            let e = format_err!("public key material is empty");
            return Err(ectx!(err e, ErrorKind::InvalidKeyMaterial));
        }
        PublicKey::from_str(raw).map_err(ectx!(ErrorKind::InvalidKeyMaterial))
    }

    /// Signs a hex-encoded SHA-256 digest, returning the compact signature in
    /// base64.
    pub fn sign(&self, digest_hex: &str, secret_key: &SecretKey) -> Result<String, Error> {
        let message = self.digest_message(digest_hex)?;
        let signature = Secp256k1::new().sign(&message, secret_key);
        Ok(base64::encode(&signature.serialize_compact()[..]))
    }

    /// Checks a base64 compact signature over a hex-encoded digest. Fails
    /// closed: any malformed digest, signature or failed check is `false`.
    pub fn verify(&self, digest_hex: &str, signature: &str, public_key: &PublicKey) -> bool {
        let message = match self.digest_message(digest_hex) {
            Ok(message) => message,
            Err(_) => return false,
        };
        let raw = match base64::decode(signature) {
            Ok(raw) => raw,
            Err(_) => return false,
        };
        let signature = match Signature::from_compact(&raw) {
            Ok(signature) => signature,
            Err(_) => return false,
        };
        Secp256k1::new().verify(&message, &signature, public_key).is_ok()
    }

    fn digest_message(&self, digest_hex: &str) -> Result<Message, Error> {
        let raw = hex::decode(digest_hex).map_err(ectx!(try ErrorKind::Internal))?;
        Message::from_slice(&raw).map_err(ectx!(ErrorKind::Internal))
    }
}

/// Key material this deployment seals orders with. Optional: without it the
/// workflow still seals orders, hash-only.
#[derive(Clone)]
pub struct SigningKey {
    pub secret_key: SecretKey,
    pub authenticator_id: AuthenticatorId,
}

impl SigningKey {
    /// Reads the signing key from config. Both the secret key and the
    /// authenticator id must be present, or both absent.
    pub fn from_config(signing: &config::Signing) -> Result<Option<SigningKey>, Error> {
        match (signing.secret_key.as_ref(), signing.authenticator_id) {
            (Some(secret_key), Some(authenticator_id)) => {
                let secret_key =
                    SecretKey::from_str(secret_key).map_err(ectx!(try ErrorKind::InvalidKeyMaterial))?;
                Ok(Some(SigningKey {
                    secret_key,
                    authenticator_id: AuthenticatorId::new(authenticator_id),
                }))
            }
            (None, None) => Ok(None),
            _ => {
                let e = format_err!("signing config needs both secret_key and authenticator_id");
                Err(ectx!(err e, ErrorKind::InvalidKeyMaterial))
            }
        }
    }

    /// Hex-encoded public key matching this secret key, as stored on the
    /// authenticator record.
    pub fn public_key_hex(&self) -> String {
        let secp = Secp256k1::new();
        hex::encode(&PublicKey::from_secret_key(&secp, &self.secret_key).serialize()[..])
    }
}
