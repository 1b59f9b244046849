//! # Proof types for credentials
//!
//! The proof object has rigid structure: unknown fields are rejected at
//! parse time, and only the Ed25519 proof type is recognized. A document
//! that names any other proof type is malformed, not merely unverifiable.

use serde::{Deserialize, Serialize};

use credseal_core::{Timestamp, VerificationMethodId};
use credseal_crypto::Ed25519Signature;

/// The type of cryptographic proof attached to a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProofType {
    /// Ed25519 signature over the JCS-canonicalized claim.
    Ed25519Signature2020,
}

impl std::fmt::Display for ProofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofType::Ed25519Signature2020 => write!(f, "Ed25519Signature2020"),
        }
    }
}

/// A cryptographic proof on a credential.
///
/// ## Security Invariant
///
/// `signature_value` is computed over the canonical form of the claim with
/// the `proof` field excluded. It serializes as 128 lowercase hex
/// characters; anything else fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Proof {
    #[serde(rename = "type")]
    pub proof_type: ProofType,

    /// When the proof was created (UTC, seconds precision).
    pub created: Timestamp,

    /// Names the key that produced the signature: `<issuer>#<key-id>`.
    #[serde(rename = "verificationMethod")]
    pub verification_method: VerificationMethodId,

    #[serde(rename = "signatureValue")]
    pub signature_value: Ed25519Signature,
}

impl Proof {
    /// Create an `Ed25519Signature2020` proof.
    pub fn new_ed25519(
        verification_method: VerificationMethodId,
        signature_value: Ed25519Signature,
        created: Timestamp,
    ) -> Self {
        Self {
            proof_type: ProofType::Ed25519Signature2020,
            created,
            verification_method,
            signature_value,
        }
    }
}
