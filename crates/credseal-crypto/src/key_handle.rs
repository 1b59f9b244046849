//! # Key Handle
//!
//! [`KeyHandle`] is the value through which an issuer signs and a verifier
//! checks. It is passed explicitly; there is no process-global key.
//!
//! A handle either holds the full keypair (can sign and verify) or only the
//! public key (can verify; `sign` returns [`CryptoError::KeyUnavailable`]).
//! Cloning a handle shares the private key behind an `Arc` rather than
//! copying it.

use std::sync::Arc;

use credseal_core::{CanonicalBytes, CryptoError};

use crate::ed25519::{hex_to_bytes, verify_signature, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

/// Handle to the issuer's key material.
#[derive(Clone)]
pub struct KeyHandle {
    public: Ed25519PublicKey,
    keypair: Option<Arc<Ed25519KeyPair>>,
}

impl KeyHandle {
    /// Wrap a full keypair.
    pub fn from_keypair(keypair: Ed25519KeyPair) -> Self {
        Self {
            public: keypair.public_key(),
            keypair: Some(Arc::new(keypair)),
        }
    }

    /// A verification-only handle.
    pub fn public_only(public: Ed25519PublicKey) -> Self {
        Self {
            public,
            keypair: None,
        }
    }

    /// Load a signing key from an environment variable holding a 64-char
    /// hex Ed25519 seed.
    pub fn from_env_seed(var_name: &str) -> Result<Self, CryptoError> {
        let hex = zeroize::Zeroizing::new(std::env::var(var_name).map_err(|_| {
            CryptoError::KeyError(format!("environment variable {var_name} not set"))
        })?);
        let bytes = zeroize::Zeroizing::new(hex_to_bytes(hex.trim())?);
        let seed: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            CryptoError::KeyError(format!(
                "expected 32 bytes (64 hex chars) in {var_name}, got {} bytes",
                bytes.len()
            ))
        })?;
        Ok(Self::from_keypair(Ed25519KeyPair::from_seed(&seed)))
    }

    /// The public half.
    pub fn public_key(&self) -> &Ed25519PublicKey {
        &self.public
    }

    /// Whether this handle holds the private key.
    pub fn can_sign(&self) -> bool {
        self.keypair.is_some()
    }

    /// Sign canonical bytes with the private key.
    pub fn sign(&self, data: &CanonicalBytes) -> Result<Ed25519Signature, CryptoError> {
        self.keypair
            .as_ref()
            .map(|kp| kp.sign(data))
            .ok_or(CryptoError::KeyUnavailable)
    }

    /// Check a signature against this handle's public key.
    pub fn verify(&self, data: &CanonicalBytes, signature: &Ed25519Signature) -> bool {
        verify_signature(&self.public, data, signature)
    }

    /// Drop the private half, keeping a verification-only handle.
    pub fn to_public_only(&self) -> Self {
        Self::public_only(self.public.clone())
    }
}

impl std::fmt::Debug for KeyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyHandle")
            .field("public", &self.public)
            .field("private", &if self.can_sign() { "<redacted>" } else { "<none>" })
            .finish()
    }
}
