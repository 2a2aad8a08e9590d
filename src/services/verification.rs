//! Integrity verification of sealed orders.
//!
//! Verification never fails the read path: an internal error while checking a
//! seal degrades to `Indeterminate`, and only an actual digest or signature
//! mismatch reports the order as tampered.

use std::sync::Arc;

use failure::Fail;

use models::{Order, OrderDetail, OrderItem};
use repos::{AuthenticatorsRepo, OrderSignaturesRepo};

use super::error::{Error, ErrorKind};
use super::fingerprint;
use super::signature::SignatureService;

/// How strongly a verified order is attested: by an asymmetric signature or
/// only by the stored digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttestationLevel {
    Signature,
    HashOnly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The seal matches the order's current content.
    Verified(AttestationLevel),
    /// The seal is intact but the order's content no longer matches it.
    Tampered,
    /// The order was never sealed.
    Unsealed,
    /// Verification could not be carried out; not a tamper verdict.
    Indeterminate,
}

impl VerificationOutcome {
    pub fn is_tampered(&self) -> bool {
        match *self {
            VerificationOutcome::Tampered => true,
            _ => false,
        }
    }

    pub fn attestation(&self) -> Option<AttestationLevel> {
        match *self {
            VerificationOutcome::Verified(level) => Some(level),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct IntegrityVerifier {
    signatures_repo: Arc<OrderSignaturesRepo>,
    authenticators_repo: Arc<AuthenticatorsRepo>,
    signature_service: SignatureService,
}

impl IntegrityVerifier {
    pub fn new(
        signatures_repo: Arc<OrderSignaturesRepo>,
        authenticators_repo: Arc<AuthenticatorsRepo>,
        signature_service: SignatureService,
    ) -> Self {
        IntegrityVerifier {
            signatures_repo,
            authenticators_repo,
            signature_service,
        }
    }

    /// Checks the order's seal against its current content. Internal failures
    /// are logged and reported as `Indeterminate`.
    pub fn verify_order(
        &self,
        order: &Order,
        items: &[OrderItem],
        detail: Option<&OrderDetail>,
    ) -> VerificationOutcome {
        match self.check(order, items, detail) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Verification of order {} is indeterminate: {}", order.id, e);
                VerificationOutcome::Indeterminate
            }
        }
    }

    fn check(
        &self,
        order: &Order,
        items: &[OrderItem],
        detail: Option<&OrderDetail>,
    ) -> Result<VerificationOutcome, Error> {
        let seal = match self.signatures_repo.get_by_order_id(order.id).map_err(ectx!(try convert))? {
            Some(seal) => seal,
            None => return Ok(VerificationOutcome::Unsealed),
        };
        let current = fingerprint::hash(&fingerprint::canonicalize(order, items, detail));

        if let Some(authenticator_id) = seal.authenticator_id {
            let authenticator = self
                .authenticators_repo
                .get(authenticator_id)
                .map_err(ectx!(try convert))?;
            if let Some(authenticator) = authenticator {
                match self.signature_service.load_public_key(&authenticator.public_key) {
                    Ok(public_key) => {
                        let signature = seal.signature.as_ref().ok_or_else(|| {
                            let e = format_err!(
                                "seal of order {} names authenticator {} but carries no signature",
                                order.id,
                                authenticator_id
                            );
                            ectx!(err e, ErrorKind::Internal)
                        })?;
                        return Ok(if self.signature_service.verify(&current, signature, &public_key) {
                            VerificationOutcome::Verified(AttestationLevel::Signature)
                        } else {
                            VerificationOutcome::Tampered
                        });
                    }
                    Err(e) => warn!(
                        "Public key of authenticator {} is unusable, checking the digest instead: {}",
                        authenticator_id, e
                    ),
                }
            } else {
                warn!(
                    "Authenticator {} of order {} is unknown, checking the digest instead",
                    authenticator_id, order.id
                );
            }
        }

        Ok(if seal.hash_order_info == current {
            VerificationOutcome::Verified(AttestationLevel::HashOnly)
        } else {
            VerificationOutcome::Tampered
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use models::{
        Amount, AuthenticatorId, NewAuthenticator, NewOrderSignature, OrderId, OrderItemId,
        OrderSignature, OrderStatus, ProductId, UserId,
    };
    use repos::{AuthenticatorsRepoImpl, OrderSignaturesRepoImpl, RepoResult};
    use services::signature::SigningKey;
    use secp256k1::key::SecretKey;
    use std::str::FromStr;

    const SECRET_HEX: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    fn order() -> Order {
        Order {
            id: OrderId::new(1),
            user_id: UserId::new(1),
            status: OrderStatus::Pending,
            delivery_method: 1,
            delivery_price: Amount::new(2000),
            total_price: Some(Amount::new(22000)),
            created_at: NaiveDate::from_ymd(2019, 3, 14).and_hms(12, 0, 0),
        }
    }

    fn items() -> Vec<OrderItem> {
        vec![OrderItem {
            id: OrderItemId::new(1),
            order_id: OrderId::new(1),
            product_id: ProductId::new(5),
            product_name: "kettle".to_string(),
            price: Amount::new(10000),
            discount: 0,
            quantity: 2,
            created_at: NaiveDate::from_ymd(2019, 3, 14).and_hms(12, 0, 0),
        }]
    }

    fn verifier() -> (IntegrityVerifier, Arc<OrderSignaturesRepoImpl>, Arc<AuthenticatorsRepoImpl>) {
        let signatures_repo = Arc::new(OrderSignaturesRepoImpl::new());
        let authenticators_repo = Arc::new(AuthenticatorsRepoImpl::new());
        let verifier = IntegrityVerifier::new(
            signatures_repo.clone(),
            authenticators_repo.clone(),
            SignatureService::new(),
        );
        (verifier, signatures_repo, authenticators_repo)
    }

    fn seal(
        signatures_repo: &OrderSignaturesRepoImpl,
        hash: String,
        signature: Option<String>,
        authenticator_id: Option<AuthenticatorId>,
    ) {
        signatures_repo
            .create(NewOrderSignature {
                order_id: OrderId::new(1),
                hash_order_info: hash,
                signature,
                authenticator_id,
                version: 1,
            })
            .unwrap();
    }

    #[test]
    fn unsealed_order_is_not_tampered() {
        let (verifier, _, _) = verifier();
        let outcome = verifier.verify_order(&order(), &items(), None);
        assert_eq!(outcome, VerificationOutcome::Unsealed);
        assert!(!outcome.is_tampered());
    }

    #[test]
    fn intact_hash_only_seal_verifies() {
        let (verifier, signatures_repo, _) = verifier();
        let digest = fingerprint::hash(&fingerprint::canonicalize(&order(), &items(), None));
        seal(&signatures_repo, digest, None, None);
        assert_eq!(
            verifier.verify_order(&order(), &items(), None),
            VerificationOutcome::Verified(AttestationLevel::HashOnly)
        );
    }

    #[test]
    fn modified_content_under_hash_only_seal_is_tampered() {
        let (verifier, signatures_repo, _) = verifier();
        let digest = fingerprint::hash(&fingerprint::canonicalize(&order(), &items(), None));
        seal(&signatures_repo, digest, None, None);
        let mut cheaper = items();
        cheaper[0].price = Amount::new(1);
        let outcome = verifier.verify_order(&order(), &cheaper, None);
        assert_eq!(outcome, VerificationOutcome::Tampered);
        assert!(outcome.is_tampered());
    }

    #[test]
    fn intact_signed_seal_verifies_at_signature_level() {
        let (verifier, signatures_repo, authenticators_repo) = verifier();
        let signing = SigningKey {
            secret_key: SecretKey::from_str(SECRET_HEX).unwrap(),
            authenticator_id: AuthenticatorId::new(0),
        };
        let authenticator = authenticators_repo
            .create(NewAuthenticator {
                public_key: signing.public_key_hex(),
            })
            .unwrap();
        let digest = fingerprint::hash(&fingerprint::canonicalize(&order(), &items(), None));
        let signature = SignatureService::new().sign(&digest, &signing.secret_key).unwrap();
        seal(&signatures_repo, digest, Some(signature), Some(authenticator.id));
        let outcome = verifier.verify_order(&order(), &items(), None);
        assert_eq!(outcome, VerificationOutcome::Verified(AttestationLevel::Signature));
        assert_eq!(outcome.attestation(), Some(AttestationLevel::Signature));
    }

    #[test]
    fn modified_content_under_signed_seal_is_tampered() {
        let (verifier, signatures_repo, authenticators_repo) = verifier();
        let signing = SigningKey {
            secret_key: SecretKey::from_str(SECRET_HEX).unwrap(),
            authenticator_id: AuthenticatorId::new(0),
        };
        let authenticator = authenticators_repo
            .create(NewAuthenticator {
                public_key: signing.public_key_hex(),
            })
            .unwrap();
        let digest = fingerprint::hash(&fingerprint::canonicalize(&order(), &items(), None));
        let signature = SignatureService::new().sign(&digest, &signing.secret_key).unwrap();
        seal(&signatures_repo, digest, Some(signature), Some(authenticator.id));
        let mut more = items();
        more[0].quantity = 5;
        assert_eq!(
            verifier.verify_order(&order(), &more, None),
            VerificationOutcome::Tampered
        );
    }

    #[test]
    fn unusable_public_key_falls_back_to_the_digest() {
        let (verifier, signatures_repo, authenticators_repo) = verifier();
        let authenticator = authenticators_repo
            .create(NewAuthenticator {
                public_key: String::new(),
            })
            .unwrap();
        let digest = fingerprint::hash(&fingerprint::canonicalize(&order(), &items(), None));
        seal(&signatures_repo, digest, Some("garbage".to_string()), Some(authenticator.id));
        assert_eq!(
            verifier.verify_order(&order(), &items(), None),
            VerificationOutcome::Verified(AttestationLevel::HashOnly)
        );
    }

    #[test]
    fn unknown_authenticator_falls_back_to_the_digest() {
        let (verifier, signatures_repo, _) = verifier();
        let digest = fingerprint::hash(&fingerprint::canonicalize(&order(), &items(), None));
        seal(&signatures_repo, digest, Some("garbage".to_string()), Some(AuthenticatorId::new(99)));
        assert_eq!(
            verifier.verify_order(&order(), &items(), None),
            VerificationOutcome::Verified(AttestationLevel::HashOnly)
        );
    }

    #[test]
    fn signed_seal_without_signature_bytes_is_indeterminate() {
        let (verifier, signatures_repo, authenticators_repo) = verifier();
        let signing = SigningKey {
            secret_key: SecretKey::from_str(SECRET_HEX).unwrap(),
            authenticator_id: AuthenticatorId::new(0),
        };
        let authenticator = authenticators_repo
            .create(NewAuthenticator {
                public_key: signing.public_key_hex(),
            })
            .unwrap();
        let digest = fingerprint::hash(&fingerprint::canonicalize(&order(), &items(), None));
        seal(&signatures_repo, digest, None, Some(authenticator.id));
        let outcome = verifier.verify_order(&order(), &items(), None);
        assert_eq!(outcome, VerificationOutcome::Indeterminate);
        assert!(!outcome.is_tampered());
    }

    #[test]
    fn store_failure_is_indeterminate_not_tampered() {
        struct BrokenSignaturesRepo;

        impl OrderSignaturesRepo for BrokenSignaturesRepo {
            fn create(&self, _payload: NewOrderSignature) -> RepoResult<OrderSignature> {
                Err(::repos::ErrorKind::Internal.into())
            }
            fn get_by_order_id(&self, _order_id: OrderId) -> RepoResult<Option<OrderSignature>> {
                Err(::repos::ErrorKind::Internal.into())
            }
            fn delete_by_order_id(&self, _order_id: OrderId) -> RepoResult<Option<OrderSignature>> {
                Err(::repos::ErrorKind::Internal.into())
            }
        }

        let verifier = IntegrityVerifier::new(
            Arc::new(BrokenSignaturesRepo),
            Arc::new(AuthenticatorsRepoImpl::new()),
            SignatureService::new(),
        );
        let outcome = verifier.verify_order(&order(), &items(), None);
        assert_eq!(outcome, VerificationOutcome::Indeterminate);
        assert!(!outcome.is_tampered());
    }
}
