//! # Verify Subcommand
//!
//! `credseal verify <file>` checks a credential against the configured
//! issuer public key, or against an explicitly supplied PEM. Output is the
//! uniform verdict; the specific reason is logged at `-v`.
//!
//! Exit code 0 means valid; 1 means anything else.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use credseal_core::VerificationMethodId;
use credseal_crypto::Ed25519PublicKey;
use credseal_vc::{verify_credential, VerificationResult};

use crate::config::CredsealConfig;

/// Arguments for `credseal verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Credential file to verify.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Trust this public key PEM for any verification method instead of the
    /// configured issuer key.
    #[arg(long)]
    pub pubkey: Option<PathBuf>,
}

/// Verify a credential file.
pub fn run_verify(args: &VerifyArgs, config: &CredsealConfig) -> Result<u8> {
    let input = std::fs::read(&args.file)
        .with_context(|| format!("failed to read credential: {}", args.file.display()))?;

    let (trusted_method, key) = trusted_key(args.pubkey.as_deref(), config)?;
    let resolver = move |method: &str| match &trusted_method {
        Some(trusted) if trusted.as_str() != method => None,
        _ => Some(key.clone()),
    };

    let result = match serde_json::from_slice(&input) {
        Ok(document) => verify_credential(&document, &resolver),
        Err(e) => {
            tracing::debug!(error = %e, "credential file is not JSON");
            VerificationResult::MalformedDocument
        }
    };
    report(&args.file, result)
}

fn trusted_key(
    pubkey: Option<&Path>,
    config: &CredsealConfig,
) -> Result<(Option<VerificationMethodId>, Ed25519PublicKey)> {
    match pubkey {
        Some(path) => {
            let pem = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read public key: {}", path.display()))?;
            let key = Ed25519PublicKey::from_pem(&pem)
                .with_context(|| format!("invalid public key: {}", path.display()))?;
            Ok((None, key))
        }
        None => {
            let store = config.key_store();
            let handle = store.load_public().with_context(|| {
                format!(
                    "failed to read issuer public key {}",
                    store.paths().public.display()
                )
            })?;
            let method = config.issuer_profile()?.verification_method;
            Ok((Some(method), handle.public_key().clone()))
        }
    }
}

fn report(file: &Path, result: VerificationResult) -> Result<u8> {
    let verdict = result.verdict();
    tracing::info!(file = %file.display(), reason = result.code(), "verification finished");
    if verdict.valid {
        println!("OK: {}", verdict.message);
        Ok(0)
    } else {
        println!("FAIL: {}", verdict.message);
        Ok(1)
    }
}
