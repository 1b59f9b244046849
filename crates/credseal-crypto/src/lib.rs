//! # credseal-crypto — Cryptographic Primitives and Key Material
//!
//! Provides the cryptographic building blocks for credseal:
//!
//! - **Ed25519** signing and verification over
//!   [`CanonicalBytes`](credseal_core::CanonicalBytes) (the only accepted
//!   message type), with PKCS#8 / SPKI PEM interchange encoding.
//! - **Key Material Manager** — [`KeyStore`] loads the issuer keypair from
//!   disk or generates and persists it exactly once, even under concurrent
//!   first use; [`KeyHandle`] is the explicitly passed value through which
//!   the issuer signs.
//!
//! ## Crate Policy
//!
//! - Depends only on `credseal-core` internally.
//! - No mocking of cryptographic operations in tests; all tests use real
//!   `CanonicalBytes` and real Ed25519.
//! - Private key material never appears in `Debug` output or logs.

pub mod ed25519;
pub mod key_handle;
pub mod key_store;

pub use ed25519::{
    verify, verify_signature, verify_with_public_key, Ed25519KeyPair, Ed25519PublicKey,
    Ed25519Signature,
};
pub use key_handle::KeyHandle;
pub use key_store::{KeyPaths, KeyProtection, KeyStore};
