//! # Issue Subcommand
//!
//! `credseal issue --subject-id <id> --field name=value ...` signs a
//! credential with the configured issuer key and writes it as pretty JSON,
//! by default to `credential_<YYYYmmdd_HHMMSS>.json`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use credseal_core::Timestamp;
use credseal_vc::{Credential, CredentialIssuer, SubjectFields};

use crate::config::CredsealConfig;

/// Arguments for `credseal issue`.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Identifier of the credential subject (e.g. did:student:5678).
    #[arg(long)]
    pub subject_id: String,

    /// A claim about the subject, as name=value. Repeatable.
    #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Write the credential to this file.
    #[arg(long, conflicts_with = "out_dir")]
    pub out: Option<PathBuf>,

    /// Directory for the generated credential file.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    Ok((name.trim().to_string(), value.to_string()))
}

/// Collect `--field` pairs, rejecting a name given twice.
fn subject_fields(pairs: &[(String, String)]) -> Result<SubjectFields> {
    let mut fields = SubjectFields::new();
    for (name, value) in pairs {
        if fields
            .insert(name.clone(), Value::String(value.clone()))
            .is_some()
        {
            anyhow::bail!("field '{name}' given more than once");
        }
    }
    Ok(fields)
}

/// Issue a credential and write it to disk.
pub fn run_issue(args: &IssueArgs, config: &CredsealConfig) -> Result<u8> {
    let fields = subject_fields(&args.fields)?;
    let store = config.key_store();
    let key = store.load_or_create().with_context(|| {
        format!(
            "failed to load or create issuer key at {}",
            store.paths().private.display()
        )
    })?;
    let issuer = CredentialIssuer::new(config.issuer_profile()?, key);

    let credential = issuer
        .issue(&args.subject_id, fields)
        .context("failed to issue credential")?;

    let path = match &args.out {
        Some(path) => path.clone(),
        None => args.out_dir.join(default_file_name(&credential.claim.issuance_date)),
    };
    write_credential(&path, &credential)?;

    println!("{}", path.display());
    Ok(0)
}

/// `credential_<YYYYmmdd_HHMMSS>.json`.
pub fn default_file_name(issued: &Timestamp) -> String {
    format!("credential_{}.json", issued.to_file_stamp())
}

fn write_credential(path: &Path, credential: &Credential) -> Result<()> {
    let json = credential
        .to_json_pretty()
        .context("failed to serialize credential")?;
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(json.as_bytes())
        .and_then(|()| file.write_all(b"\n"))
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), subject = %credential.claim.credential_subject.id, "wrote credential");
    Ok(())
}
