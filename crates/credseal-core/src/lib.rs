//! # credseal-core — Foundational Types
//!
//! The leaf crate of the credseal workspace. It defines the primitives the
//! signing and verification paths are built on. Every other crate depends
//! on `credseal-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** Every byte sequence that is signed or
//!    verified flows through `CanonicalBytes::new()` or
//!    `CanonicalBytes::from_value()`. No raw `serde_json::to_vec()` on a
//!    signing path, ever. Issuer and verifier cannot disagree on the
//!    serialization because there is only one.
//!
//! 2. **UTC-only timestamps.** `Timestamp` renders `YYYY-MM-DDTHH:MM:SSZ`
//!    and parsing rejects offsets other than `Z`. Time comes from a
//!    [`Clock`] so issuance is reproducible in tests.
//!
//! 3. **Newtype identifiers.** `IssuerId`, `SubjectId` and
//!    `VerificationMethodId` have validated constructors; an empty
//!    identifier cannot be constructed.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `credseal-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use error::{CanonicalizationError, CryptoError, IdentifierError, TimestampError};
pub use identity::{IssuerId, SubjectId, VerificationMethodId};
pub use temporal::{Clock, FixedClock, SystemClock, Timestamp};
