//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across credseal. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every failure is a value returned to the immediate caller. None are
//!   fatal to the process, and none leave key material half-written.
//! - Cryptographic errors carry enough context to diagnose (paths, key
//!   fingerprints) but never key bytes.
//! - Verification outcomes are *not* errors: the verifier returns a verdict
//!   enum. The types here cover the issuing and key-handling paths.

use thiserror::Error;

/// Error during canonical serialization (the "encoding error" class).
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// A `null` was found in the tree. Absent values are caller errors and
    /// are never encoded.
    #[error("null value at {path}; absent fields must be omitted by the caller, not encoded")]
    NullValue {
        /// JSON-pointer style location of the offending value.
        path: String,
    },

    /// The value could not be represented as JSON at all.
    #[error("value is not representable as canonical JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error in cryptographic operations and key-material handling.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key generation, parsing, or encoding failed.
    #[error("key error: {0}")]
    KeyError(String),

    /// A signing operation was attempted on a handle that holds only the
    /// public half of the keypair.
    #[error("private key unavailable: this handle can verify but not sign")]
    KeyUnavailable,

    /// The persisted public key does not belong to the persisted private key.
    #[error("public key at {path} does not match the private key")]
    KeyMismatch {
        /// Path of the public key file that failed the check.
        path: String,
    },

    /// Hex decoding failed.
    #[error("hex decode error: {0}")]
    HexDecode(String),

    /// Filesystem error while loading or persisting key material.
    #[error("key storage I/O error at {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl CryptoError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

/// Error parsing a timestamp.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid timestamp {input:?}: {reason}")]
pub struct TimestampError {
    /// The rejected input.
    pub input: String,
    /// Why it was rejected.
    pub reason: String,
}

/// Error constructing a validated identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The identifier was empty or whitespace only.
    #[error("{kind} must not be empty")]
    Empty {
        /// Which identifier kind was being constructed.
        kind: &'static str,
    },

    /// The identifier contained characters it may not contain.
    #[error("{kind} {value:?} is invalid: {reason}")]
    Invalid {
        /// Which identifier kind was being constructed.
        kind: &'static str,
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}
