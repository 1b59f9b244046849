//! # credseal-cli — Command-Line Interface
//!
//! Provides the `credseal` binary: the operator-facing shell around the
//! issuer and verifier.
//!
//! ## Subcommands
//!
//! - `credseal keygen` — Create (once) or load the issuer keypair.
//! - `credseal issue` — Sign a credential for a subject and write it to disk.
//! - `credseal verify` — Check a credential file; exit 0 if valid.
//! - `credseal pubkey` — Print the issuer public key for verifiers.
//! - `credseal canonicalize` — Print a document's canonical signing input.
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers; handlers return an
//!   exit code and delegate to the library crates.
//! - Errors are `anyhow` with context naming the file involved.

pub mod canonicalize;
pub mod config;
pub mod issue;
pub mod keys;
pub mod verify;
