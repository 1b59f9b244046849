//! # Credential Verifier
//!
//! Checks a credential document against the issuer's public key. Every
//! outcome is a [`VerificationResult`] value; nothing here panics or
//! returns `Err`, whatever the input.
//!
//! ## Order of checks
//!
//! 1. The document must parse as a [`Credential`]; otherwise
//!    `MalformedDocument`.
//! 2. `proof.verificationMethod` must resolve to a key; otherwise
//!    `UnknownVerificationMethod`.
//! 3. The raw document, proof stripped, is canonicalized and the signature
//!    checked: `Valid` or `InvalidSignature`.
//!
//! Step 3 works on the raw JSON rather than the typed [`Credential`], so
//! the bytes checked are exactly the bytes the document carries.

use serde_json::Value;

use credseal_crypto::verify_signature;

use crate::credential::{signing_input_of, Credential};
use crate::resolver::KeyResolver;

/// The outcome of verifying one credential document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationResult {
    Valid,
    InvalidSignature,
    MalformedDocument,
    UnknownVerificationMethod,
}

/// What to show a user about a verification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub valid: bool,
    pub message: &'static str,
}

const VALID_MESSAGE: &str = "Credential is valid: the signature matches the issuer's public key.";
const INVALID_MESSAGE: &str =
    "Credential is not valid: it was altered, is incomplete, or was not signed by a trusted key.";

impl VerificationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::InvalidSignature => "invalid_signature",
            Self::MalformedDocument => "malformed_document",
            Self::UnknownVerificationMethod => "unknown_verification_method",
        }
    }

    /// The user-facing verdict. All failures share one message.
    pub fn verdict(&self) -> Verdict {
        if self.is_valid() {
            Verdict {
                valid: true,
                message: VALID_MESSAGE,
            }
        } else {
            Verdict {
                valid: false,
                message: INVALID_MESSAGE,
            }
        }
    }
}

impl std::fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Verify a credential document against keys from `resolver`.
pub fn verify_credential(document: &Value, resolver: &impl KeyResolver) -> VerificationResult {
    let result = check(document, resolver);
    if result.is_valid() {
        tracing::debug!(result = result.code(), "credential verified");
    } else {
        tracing::info!(result = result.code(), "credential rejected");
    }
    result
}

fn check(document: &Value, resolver: &impl KeyResolver) -> VerificationResult {
    let credential = match Credential::from_value(document.clone()) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, "malformed credential document");
            return VerificationResult::MalformedDocument;
        }
    };

    let method = credential.proof.verification_method.as_str();
    let Some(key) = resolver.resolve(method) else {
        tracing::debug!(verification_method = method, "no trusted key for verification method");
        return VerificationResult::UnknownVerificationMethod;
    };

    let input = match signing_input_of(document) {
        Ok(input) => input,
        Err(e) => {
            tracing::debug!(error = %e, "credential body cannot be canonicalized");
            return VerificationResult::MalformedDocument;
        }
    };

    if verify_signature(&key, &input, &credential.proof.signature_value) {
        VerificationResult::Valid
    } else {
        VerificationResult::InvalidSignature
    }
}

/// Verifies credentials against a fixed resolver.
#[derive(Debug, Clone)]
pub struct CredentialVerifier<R> {
    resolver: R,
}

impl<R: KeyResolver> CredentialVerifier<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn verify(&self, document: &Value) -> VerificationResult {
        verify_credential(document, &self.resolver)
    }

    /// Verify raw JSON bytes. Input that is not JSON is malformed.
    pub fn verify_json(&self, input: &[u8]) -> VerificationResult {
        match serde_json::from_slice::<Value>(input) {
            Ok(document) => self.verify(&document),
            Err(e) => {
                tracing::info!(error = %e, result = "malformed_document", "credential rejected");
                VerificationResult::MalformedDocument
            }
        }
    }

    /// Verify a typed credential by way of its JSON form.
    pub fn verify_credential(&self, credential: &Credential) -> VerificationResult {
        match credential.to_value() {
            Ok(document) => self.verify(&document),
            Err(_) => VerificationResult::MalformedDocument,
        }
    }
}
