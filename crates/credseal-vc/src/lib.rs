//! # credseal-vc — Signed Credentials
//!
//! Provides:
//!
//! - **Document model** ([`Credential`], [`Claim`], [`Proof`]) with the
//!   flat JSON wire form.
//! - **Issuance** ([`CredentialIssuer`]): validate, canonicalize, sign, and
//!   attach an `Ed25519Signature2020` proof.
//! - **Verification** ([`CredentialVerifier`]): a total function from a
//!   JSON document to a [`VerificationResult`], with keys supplied through a
//!   [`KeyResolver`].
//!
//! ## Security Invariants
//!
//! - The signing input is always [`CanonicalBytes`](credseal_core::CanonicalBytes)
//!   of the document with `proof` removed. Issuer and verifier share the
//!   same canonicalizer.
//! - A proof is always a real signature. No code path accepts a bare digest
//!   in its place.

pub mod credential;
pub mod issuer;
pub mod proof;
pub mod resolver;
pub mod verifier;

pub use credential::{
    signing_input_of, Claim, Credential, CredentialSubject, DocumentError, SubjectFields,
};
pub use issuer::{CredentialIssuer, IssuerProfile, VcError};
pub use proof::{Proof, ProofType};
pub use resolver::{KeyResolver, TrustStore};
pub use verifier::{verify_credential, CredentialVerifier, VerificationResult, Verdict};
