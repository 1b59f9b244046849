//! # Canonicalize Subcommand
//!
//! `credseal canonicalize <file>` prints the exact bytes a credential's
//! signature covers: the document with `proof` removed, in canonical JSON.
//! Useful when checking another implementation against this one.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use credseal_vc::signing_input_of;

/// Arguments for `credseal canonicalize`.
#[derive(Args, Debug)]
pub struct CanonicalizeArgs {
    /// JSON document to canonicalize.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

pub fn run_canonicalize(args: &CanonicalizeArgs) -> Result<u8> {
    let input = std::fs::read(&args.file)
        .with_context(|| format!("failed to read document: {}", args.file.display()))?;
    let canonical = canonical_form(&input)
        .with_context(|| format!("failed to canonicalize {}", args.file.display()))?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&canonical)?;
    stdout.write_all(b"\n")?;
    Ok(0)
}

fn canonical_form(input: &[u8]) -> Result<Vec<u8>> {
    let document: serde_json::Value =
        serde_json::from_slice(input).context("document is not valid JSON")?;
    Ok(signing_input_of(&document)?.as_bytes().to_vec())
}
