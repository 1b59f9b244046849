//! # credseal CLI entry point
//!
//! Parses command-line arguments, loads configuration, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use credseal_cli::canonicalize::{run_canonicalize, CanonicalizeArgs};
use credseal_cli::config::CredsealConfig;
use credseal_cli::issue::{run_issue, IssueArgs};
use credseal_cli::keys::{run_keygen, run_pubkey, KeygenArgs, PubkeyArgs};
use credseal_cli::verify::{run_verify, VerifyArgs};

/// credseal — issue and verify signed credentials.
#[derive(Parser, Debug)]
#[command(name = "credseal", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the issuer keypair if absent, and show where it lives.
    Keygen(KeygenArgs),

    /// Issue a signed credential.
    Issue(IssueArgs),

    /// Verify a credential file.
    Verify(VerifyArgs),

    /// Print the issuer public key.
    Pubkey(PubkeyArgs),

    /// Print the canonical signing input of a document.
    Canonicalize(CanonicalizeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("credseal CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = CredsealConfig::load(cli.config.as_deref())
        .context("failed to load configuration")
        .and_then(|config| {
            tracing::debug!(?config, "configuration loaded");
            match &cli.command {
                Commands::Keygen(args) => run_keygen(args, &config),
                Commands::Issue(args) => run_issue(args, &config),
                Commands::Verify(args) => run_verify(args, &config),
                Commands::Pubkey(args) => run_pubkey(args, &config),
                Commands::Canonicalize(args) => run_canonicalize(args),
            }
        });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
