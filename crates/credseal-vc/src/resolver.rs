//! # Key resolution
//!
//! A verifier does not hold keys itself: it asks a [`KeyResolver`] for the
//! public key named by `proof.verificationMethod`. Unknown methods resolve
//! to `None`.

use std::collections::BTreeMap;

use credseal_core::VerificationMethodId;
use credseal_crypto::{Ed25519PublicKey, KeyHandle};

/// Maps a verification method string to a trusted public key.
pub trait KeyResolver {
    fn resolve(&self, verification_method: &str) -> Option<Ed25519PublicKey>;
}

impl<F> KeyResolver for F
where
    F: Fn(&str) -> Option<Ed25519PublicKey>,
{
    fn resolve(&self, verification_method: &str) -> Option<Ed25519PublicKey> {
        self(verification_method)
    }
}

/// An in-memory set of trusted keys.
///
/// Holding several methods for one issuer (`#keys-1`, `#keys-2`, ...) keeps
/// credentials signed under a retired key verifiable after rotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustStore {
    keys: BTreeMap<VerificationMethodId, Ed25519PublicKey>,
}

impl TrustStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store trusting exactly one key.
    pub fn single(verification_method: VerificationMethodId, key: &KeyHandle) -> Self {
        let mut store = Self::new();
        store.insert(verification_method, key.public_key().clone());
        store
    }

    /// Trust `key` for `verification_method`, returning any key it replaces.
    pub fn insert(
        &mut self,
        verification_method: VerificationMethodId,
        key: Ed25519PublicKey,
    ) -> Option<Ed25519PublicKey> {
        self.keys.insert(verification_method, key)
    }

    pub fn with(mut self, verification_method: VerificationMethodId, key: Ed25519PublicKey) -> Self {
        self.insert(verification_method, key);
        self
    }

    pub fn remove(&mut self, verification_method: &VerificationMethodId) -> Option<Ed25519PublicKey> {
        self.keys.remove(verification_method)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn methods(&self) -> impl Iterator<Item = &VerificationMethodId> {
        self.keys.keys()
    }
}

impl KeyResolver for TrustStore {
    fn resolve(&self, verification_method: &str) -> Option<Ed25519PublicKey> {
        let method = VerificationMethodId::parse(verification_method).ok()?;
        self.keys.get(&method).cloned()
    }
}
