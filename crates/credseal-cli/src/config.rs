//! CLI configuration.
//!
//! Loaded from an optional YAML file, then overridden by environment
//! variables. Every field has a default, so no file is required.
//!
//! Variables:
//! - `CREDSEAL_ISSUER` (default: `did:univ:1234`)
//! - `CREDSEAL_KEY_ID` (default: `keys-1`)
//! - `CREDSEAL_KEY_DIR` (default: `.`)
//! - the variable named by `passphrase_env` (default:
//!   `CREDSEAL_KEY_PASSPHRASE`): if set and non-empty, the private key is
//!   stored passphrase-encrypted.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use credseal_core::IssuerId;
use credseal_crypto::key_store::DEFAULT_KEY_PREFIX;
use credseal_crypto::{KeyPaths, KeyProtection, KeyStore};
use credseal_vc::issuer::{DEFAULT_CONTEXT, DEFAULT_CREDENTIAL_TYPES, DEFAULT_ISSUER, DEFAULT_KEY_ID};
use credseal_vc::IssuerProfile;

pub const ENV_ISSUER: &str = "CREDSEAL_ISSUER";
pub const ENV_KEY_ID: &str = "CREDSEAL_KEY_ID";
pub const ENV_KEY_DIR: &str = "CREDSEAL_KEY_DIR";
pub const DEFAULT_PASSPHRASE_ENV: &str = "CREDSEAL_KEY_PASSPHRASE";

/// Issuer and key-store settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CredsealConfig {
    pub issuer: String,
    pub key_id: String,
    pub key_dir: PathBuf,
    pub key_prefix: String,
    /// Name of the environment variable holding the key passphrase. The
    /// passphrase itself never lives in the config.
    pub passphrase_env: String,
    pub context: Vec<String>,
    pub credential_types: Vec<String>,
}

impl Default for CredsealConfig {
    fn default() -> Self {
        Self {
            issuer: DEFAULT_ISSUER.to_string(),
            key_id: DEFAULT_KEY_ID.to_string(),
            key_dir: PathBuf::from("."),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            passphrase_env: DEFAULT_PASSPHRASE_ENV.to_string(),
            context: DEFAULT_CONTEXT.iter().map(|s| s.to_string()).collect(),
            credential_types: DEFAULT_CREDENTIAL_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl CredsealConfig {
    /// Load from `path` (if given), then apply process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(|var| std::env::var(var).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Apply overrides from `lookup` (normally the process environment).
    /// Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        if let Some(issuer) = get(ENV_ISSUER) {
            self.issuer = issuer;
        }
        if let Some(key_id) = get(ENV_KEY_ID) {
            self.key_id = key_id;
        }
        if let Some(dir) = get(ENV_KEY_DIR) {
            self.key_dir = PathBuf::from(dir);
        }
        self
    }

    pub fn key_paths(&self) -> KeyPaths {
        KeyPaths::in_dir(&self.key_dir, &self.key_prefix)
    }

    /// Passphrase protection if the configured variable is set.
    pub fn key_protection(&self) -> KeyProtection {
        match std::env::var(&self.passphrase_env) {
            Ok(pass) if !pass.is_empty() => KeyProtection::passphrase(pass),
            _ => KeyProtection::Plaintext,
        }
    }

    pub fn key_store(&self) -> KeyStore {
        KeyStore::new(self.key_paths(), self.key_protection())
    }

    pub fn issuer_profile(&self) -> Result<IssuerProfile, ConfigError> {
        let issuer =
            IssuerId::new(self.issuer.clone()).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        let profile = IssuerProfile::new(issuer, &self.key_id)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(profile
            .with_context(self.context.clone())
            .with_credential_types(self.credential_types.clone()))
    }
}
