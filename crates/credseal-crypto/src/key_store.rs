//! # Key Material Manager
//!
//! [`KeyStore`] owns the on-disk issuer keypair: a PKCS#8 PEM private key
//! and an SPKI PEM public key at two configured paths.
//!
//! ## Lifecycle
//!
//! - [`KeyStore::load_or_create`] returns the existing keypair, or generates
//!   one and persists both halves if none exists. It is idempotent: repeated
//!   calls with unchanged files return the same key.
//! - Creation is race-safe. Each file is written to a temporary file in the
//!   destination directory and published with a no-clobber link, so the
//!   first writer wins and every other caller loads the winner's key. A
//!   reader never observes a half-written PEM.
//! - The private key is published before the public key. A store holding
//!   only the private file (a crash between the two steps) is repaired on
//!   the next load by deriving and publishing the public half.
//! - A public file that does not belong to the private key is reported as
//!   [`CryptoError::KeyMismatch`]; it is never silently overwritten.
//! - A public file with no private file is an error. Nothing is generated
//!   or written in that case.
//!
//! ## Protection
//!
//! The private file is created owner-only (0600 on Unix). With
//! [`KeyProtection::Passphrase`] it is additionally encrypted as PKCS#8
//! `ENCRYPTED PRIVATE KEY`.

use std::io::Write;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use credseal_core::CryptoError;

use crate::ed25519::{is_encrypted_pem, Ed25519KeyPair, Ed25519PublicKey};
use crate::key_handle::KeyHandle;

/// Default file-name prefix for the issuer keypair.
pub const DEFAULT_KEY_PREFIX: &str = "issuer";

/// Locations of the two PEM files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPaths {
    /// PKCS#8 private key.
    pub private: PathBuf,
    /// SPKI public key.
    pub public: PathBuf,
}

impl KeyPaths {
    pub fn new(private: impl Into<PathBuf>, public: impl Into<PathBuf>) -> Self {
        Self {
            private: private.into(),
            public: public.into(),
        }
    }

    /// `<dir>/<prefix>_private.pem` and `<dir>/<prefix>_public.pem`.
    pub fn in_dir(dir: impl AsRef<Path>, prefix: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            private: dir.join(format!("{prefix}_private.pem")),
            public: dir.join(format!("{prefix}_public.pem")),
        }
    }
}

/// How the private key is protected at rest.
#[derive(Clone, Default)]
pub enum KeyProtection {
    /// Unencrypted PKCS#8, relying on file permissions.
    #[default]
    Plaintext,
    /// PKCS#8 encrypted with the given passphrase.
    Passphrase(Zeroizing<String>),
}

impl KeyProtection {
    pub fn passphrase(passphrase: impl Into<String>) -> Self {
        Self::Passphrase(Zeroizing::new(passphrase.into()))
    }
}

impl std::fmt::Debug for KeyProtection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plaintext => f.write_str("Plaintext"),
            Self::Passphrase(_) => f.write_str("Passphrase([REDACTED])"),
        }
    }
}

/// The issuer key-material store.
#[derive(Debug, Clone)]
pub struct KeyStore {
    paths: KeyPaths,
    protection: KeyProtection,
}

impl KeyStore {
    pub fn new(paths: KeyPaths, protection: KeyProtection) -> Self {
        Self { paths, protection }
    }

    pub fn paths(&self) -> &KeyPaths {
        &self.paths
    }

    /// Load the keypair, generating and persisting it first if absent.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::Io`] if the directory or files cannot be read or
    ///   written.
    /// - [`CryptoError::KeyError`] if an existing file is not a valid key or
    ///   cannot be decrypted.
    /// - [`CryptoError::KeyMismatch`] if the public file does not match.
    /// - [`CryptoError::KeyError`] if the public file exists without the
    ///   private file.
    pub fn load_or_create(&self) -> Result<KeyHandle, CryptoError> {
        if self.paths.private.exists() {
            return self.load();
        }
        // The private file is always published first, so a public file
        // seen here without one is orphaned unless a creator just finished.
        if self.paths.public.exists() {
            if self.paths.private.exists() {
                return self.load();
            }
            tracing::error!(
                public = %self.paths.public.display(),
                private = %self.paths.private.display(),
                "issuer public key present without its private key"
            );
            return Err(CryptoError::KeyError(format!(
                "public key {} exists but private key {} is missing; refusing to generate a new key",
                self.paths.public.display(),
                self.paths.private.display()
            )));
        }

        let dir = parent_dir(&self.paths.private);
        std::fs::create_dir_all(dir).map_err(|e| CryptoError::io(dir, e))?;

        let keypair = Ed25519KeyPair::generate();
        let pem = match &self.protection {
            KeyProtection::Plaintext => keypair.to_pkcs8_pem()?,
            KeyProtection::Passphrase(pass) => keypair.to_encrypted_pkcs8_pem(pass)?,
        };

        if !publish_noclobber(&self.paths.private, pem.as_bytes(), FileMode::Private)? {
            tracing::info!(
                path = %self.paths.private.display(),
                "issuer key was created concurrently; loading the existing one"
            );
            return self.load();
        }

        let public = keypair.public_key();
        self.ensure_public_file(&public)?;
        tracing::info!(
            private = %self.paths.private.display(),
            public = %self.paths.public.display(),
            fingerprint = %public.fingerprint(),
            encrypted = matches!(self.protection, KeyProtection::Passphrase(_)),
            "generated new issuer keypair"
        );
        Ok(KeyHandle::from_keypair(keypair))
    }

    /// Load an existing keypair without ever creating one.
    ///
    /// Repairs a missing public file; rejects a mismatched one.
    pub fn load(&self) -> Result<KeyHandle, CryptoError> {
        let pem = Zeroizing::new(
            std::fs::read_to_string(&self.paths.private)
                .map_err(|e| CryptoError::io(&self.paths.private, e))?,
        );
        let keypair = self.decode_private(&pem)?;
        let public = keypair.public_key();
        self.ensure_public_file(&public)?;
        tracing::debug!(
            path = %self.paths.private.display(),
            fingerprint = %public.fingerprint(),
            "loaded issuer keypair"
        );
        Ok(KeyHandle::from_keypair(keypair))
    }

    /// Load only the public key, for verification.
    pub fn load_public(&self) -> Result<KeyHandle, CryptoError> {
        Ok(KeyHandle::public_only(read_public(&self.paths.public)?))
    }

    fn decode_private(&self, pem: &str) -> Result<Ed25519KeyPair, CryptoError> {
        match (&self.protection, is_encrypted_pem(pem)) {
            (KeyProtection::Passphrase(pass), true) => {
                Ed25519KeyPair::from_encrypted_pkcs8_pem(pem, pass)
            }
            (KeyProtection::Plaintext, true) => Err(CryptoError::KeyError(format!(
                "private key at {} is passphrase-protected but no passphrase was configured",
                self.paths.private.display()
            ))),
            (KeyProtection::Passphrase(_), false) => {
                tracing::warn!(
                    path = %self.paths.private.display(),
                    "passphrase configured but the private key on disk is not encrypted"
                );
                Ed25519KeyPair::from_pkcs8_pem(pem)
            }
            (KeyProtection::Plaintext, false) => Ed25519KeyPair::from_pkcs8_pem(pem),
        }
    }

    /// Publish the public file if missing, otherwise check it matches.
    fn ensure_public_file(&self, expected: &Ed25519PublicKey) -> Result<(), CryptoError> {
        let path = &self.paths.public;
        if !path.exists() {
            let pem = expected.to_pem()?;
            if publish_noclobber(path, pem.as_bytes(), FileMode::Public)? {
                tracing::info!(path = %path.display(), "published issuer public key");
                return Ok(());
            }
        }
        let on_disk = read_public(path)?;
        if &on_disk != expected {
            tracing::error!(
                path = %path.display(),
                expected = %expected.fingerprint(),
                found = %on_disk.fingerprint(),
                "issuer public key does not match private key"
            );
            return Err(CryptoError::KeyMismatch {
                path: path.display().to_string(),
            });
        }
        Ok(())
    }
}

fn read_public(path: &Path) -> Result<Ed25519PublicKey, CryptoError> {
    let pem = std::fs::read_to_string(path).map_err(|e| CryptoError::io(path, e))?;
    Ed25519PublicKey::from_pem(&pem)
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

#[derive(Clone, Copy)]
enum FileMode {
    Private,
    Public,
}

/// Write `contents` to `path` only if `path` does not exist.
///
/// Returns `Ok(false)` when another writer got there first.
fn publish_noclobber(path: &Path, contents: &[u8], mode: FileMode) -> Result<bool, CryptoError> {
    let dir = parent_dir(path);
    let mut tmp = tempfile::Builder::new()
        .prefix(".credseal-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| CryptoError::io(dir, e))?;
    tmp.write_all(contents)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| CryptoError::io(tmp.path(), e))?;

    #[cfg(unix)]
    if let FileMode::Public = mode {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(|e| CryptoError::io(tmp.path(), e))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    match tmp.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(CryptoError::io(path, e.error)),
    }
}
