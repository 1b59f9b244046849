//! # Key Subcommands
//!
//! `credseal keygen` creates the issuer keypair on first use (or loads the
//! existing one) and reports where it lives. `credseal pubkey` prints the
//! public key PEM for distribution to verifiers.
//!
//! Neither command ever overwrites existing key material.

use anyhow::{Context, Result};
use clap::Args;

use crate::config::CredsealConfig;

/// Arguments for `credseal keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {}

/// Arguments for `credseal pubkey`.
#[derive(Args, Debug)]
pub struct PubkeyArgs {
    /// Print the SHA-256 fingerprint instead of the PEM.
    #[arg(long)]
    pub fingerprint: bool,
}

/// Load or create the issuer keypair.
pub fn run_keygen(_args: &KeygenArgs, config: &CredsealConfig) -> Result<u8> {
    let store = config.key_store();
    let handle = store.load_or_create().with_context(|| {
        format!(
            "failed to load or create issuer key at {}",
            store.paths().private.display()
        )
    })?;
    let profile = config.issuer_profile()?;

    println!("OK: issuer keypair ready");
    println!("  Private key:         {}", store.paths().private.display());
    println!("  Public key:          {}", store.paths().public.display());
    println!("  Verification method: {}", profile.verification_method);
    println!("  Fingerprint:         {}", handle.public_key().fingerprint());
    Ok(0)
}

/// Print the issuer public key.
pub fn run_pubkey(args: &PubkeyArgs, config: &CredsealConfig) -> Result<u8> {
    let store = config.key_store();
    let handle = store.load_public().with_context(|| {
        format!(
            "failed to read public key {} (run `credseal keygen` first)",
            store.paths().public.display()
        )
    })?;
    if args.fingerprint {
        println!("{}", handle.public_key().fingerprint());
    } else {
        print!("{}", handle.public_key().to_pem()?);
    }
    Ok(0)
}
