//! # Credential Issuer
//!
//! Turns a subject identifier and a set of claim fields into a signed
//! [`Credential`]. The issuer identity, context and credential types come
//! from an [`IssuerProfile`], which is bound to the signing key: the
//! verification method written into every proof names that key.
//!
//! Issuance is pure: no I/O, no global state. The key is an explicit
//! [`KeyHandle`] and time comes from a [`Clock`].

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use credseal_core::{
    CanonicalizationError, Clock, CryptoError, IdentifierError, IssuerId, SubjectId,
    SystemClock, VerificationMethodId,
};
use credseal_crypto::KeyHandle;

use crate::credential::{Claim, Credential, CredentialSubject, SubjectFields};
use crate::proof::Proof;

/// Default issuer identifier.
pub const DEFAULT_ISSUER: &str = "did:univ:1234";

/// Default key fragment of the verification method.
pub const DEFAULT_KEY_ID: &str = "keys-1";

/// Default `@context`.
pub const DEFAULT_CONTEXT: &[&str] = &["https://www.w3.org/2018/credentials/v1"];

/// Default credential `type` list.
pub const DEFAULT_CREDENTIAL_TYPES: &[&str] = &["VerifiableCredential", "CourseCertificate"];

/// Errors from credential issuance.
#[derive(Error, Debug)]
pub enum VcError {
    /// The claim is incomplete or ill-formed. Nothing was signed.
    #[error("invalid claim: {0}")]
    InvalidClaim(String),

    /// The claim could not be canonicalized.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Signing failed, typically because the key handle has no private half.
    #[error("signing failed: {0}")]
    Crypto(#[from] CryptoError),
}

impl From<IdentifierError> for VcError {
    fn from(err: IdentifierError) -> Self {
        Self::InvalidClaim(err.to_string())
    }
}

/// Who is issuing, and what kind of credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerProfile {
    pub issuer: IssuerId,
    pub verification_method: VerificationMethodId,
    pub context: Vec<String>,
    pub credential_types: Vec<String>,
}

impl IssuerProfile {
    /// Profile for `issuer` signing with key fragment `key_id`, using the
    /// default context and credential types.
    pub fn new(issuer: IssuerId, key_id: &str) -> Result<Self, IdentifierError> {
        let verification_method = VerificationMethodId::for_issuer(&issuer, key_id)?;
        Ok(Self {
            issuer,
            verification_method,
            context: DEFAULT_CONTEXT.iter().map(|s| s.to_string()).collect(),
            credential_types: DEFAULT_CREDENTIAL_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })
    }

    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = context;
        self
    }

    pub fn with_credential_types(mut self, types: Vec<String>) -> Self {
        self.credential_types = types;
        self
    }

    fn validate(&self) -> Result<(), VcError> {
        if self.verification_method.controller() != self.issuer.as_str() {
            return Err(VcError::InvalidClaim(format!(
                "verification method {} is not controlled by issuer {}",
                self.verification_method, self.issuer
            )));
        }
        non_blank_list("@context", &self.context)?;
        non_blank_list("type", &self.credential_types)
    }
}

fn non_blank_list(name: &str, items: &[String]) -> Result<(), VcError> {
    if items.is_empty() {
        return Err(VcError::InvalidClaim(format!("{name} must not be empty")));
    }
    if items.iter().any(|s| s.trim().is_empty()) {
        return Err(VcError::InvalidClaim(format!(
            "{name} must not contain blank entries"
        )));
    }
    Ok(())
}

/// Signs credentials with one issuer key.
pub struct CredentialIssuer {
    profile: IssuerProfile,
    key: KeyHandle,
    clock: Arc<dyn Clock>,
}

impl CredentialIssuer {
    pub fn new(profile: IssuerProfile, key: KeyHandle) -> Self {
        Self::with_clock(profile, key, Arc::new(SystemClock))
    }

    pub fn with_clock(profile: IssuerProfile, key: KeyHandle, clock: Arc<dyn Clock>) -> Self {
        Self {
            profile,
            key,
            clock,
        }
    }

    pub fn profile(&self) -> &IssuerProfile {
        &self.profile
    }

    pub fn key(&self) -> &KeyHandle {
        &self.key
    }

    /// Issue a signed credential for `subject_id` asserting `fields`.
    ///
    /// # Errors
    ///
    /// - [`VcError::InvalidClaim`] for a blank subject id, no fields, a
    ///   blank field name or value, a `null` anywhere in a value, or a field
    ///   named `id`, or a profile whose verification method belongs to
    ///   another issuer. Checked before anything is signed.
    /// - [`VcError::Canonicalization`] if the claim cannot be encoded.
    /// - [`VcError::Crypto`] with [`CryptoError::KeyUnavailable`] if the key
    ///   handle cannot sign.
    pub fn issue(&self, subject_id: &str, fields: SubjectFields) -> Result<Credential, VcError> {
        self.profile.validate()?;
        let subject_id = SubjectId::new(subject_id)?;
        validate_fields(&fields)?;

        let claim = Claim {
            context: self.profile.context.clone(),
            types: self.profile.credential_types.clone(),
            issuer: self.profile.issuer.clone(),
            issuance_date: self.clock.now(),
            credential_subject: CredentialSubject {
                id: subject_id,
                fields,
            },
        };

        let input = claim.signing_input()?;
        let signature = self.key.sign(&input)?;
        let proof = Proof::new_ed25519(
            self.profile.verification_method.clone(),
            signature,
            self.clock.now(),
        );

        tracing::debug!(
            subject = %claim.credential_subject.id,
            verification_method = %proof.verification_method,
            fields = claim.credential_subject.fields.len(),
            "issued credential"
        );
        Ok(Credential { claim, proof })
    }
}

impl std::fmt::Debug for CredentialIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialIssuer")
            .field("profile", &self.profile)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

fn validate_fields(fields: &SubjectFields) -> Result<(), VcError> {
    if fields.is_empty() {
        return Err(VcError::InvalidClaim(
            "at least one subject field is required".to_string(),
        ));
    }
    for (name, value) in fields {
        if name.trim().is_empty() {
            return Err(VcError::InvalidClaim(
                "subject field names must not be blank".to_string(),
            ));
        }
        if name == "id" {
            return Err(VcError::InvalidClaim(
                "subject field 'id' is reserved for the subject identifier".to_string(),
            ));
        }
        validate_value(name, value)?;
    }
    Ok(())
}

fn validate_value(name: &str, value: &Value) -> Result<(), VcError> {
    let empty = match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => {
            for item in items {
                validate_value(name, item)?;
            }
            items.is_empty()
        }
        Value::Object(map) => {
            for item in map.values() {
                validate_value(name, item)?;
            }
            map.is_empty()
        }
        Value::Bool(_) | Value::Number(_) => false,
    };
    if empty {
        return Err(VcError::InvalidClaim(format!(
            "subject field '{name}' must not be empty"
        )));
    }
    Ok(())
}
