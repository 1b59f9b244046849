//! # Credential document model
//!
//! A [`Credential`] is a [`Claim`] with a [`Proof`] attached. On the wire it
//! is a single flat JSON object: the claim fields followed by `proof`.
//!
//! ## Security Invariants
//!
//! - **Signing input** is the canonical form of the claim, i.e. the
//!   document with `proof` removed. [`signing_input_of()`] is the one
//!   strip-then-canonicalize path; it works on the raw JSON tree so a
//!   field added after signing changes the input and breaks the signature.
//! - The claim envelope is rigid (unknown top-level fields are rejected),
//!   while `credentialSubject` is open for arbitrary claim fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use credseal_core::{CanonicalBytes, CanonicalizationError, IssuerId, SubjectId, Timestamp};

use crate::proof::Proof;

/// Name of the proof member in a credential document.
pub const PROOF_FIELD: &str = "proof";

/// Claim fields about the subject, in key order.
pub type SubjectFields = BTreeMap<String, Value>;

/// Why a JSON document is not a well-formed credential.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The input is not JSON.
    #[error("document is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// The top level is not a JSON object.
    #[error("document must be a JSON object")]
    NotAnObject,

    /// There is no `proof` member.
    #[error("document has no proof")]
    MissingProof,

    /// The `proof` member has the wrong shape.
    #[error("invalid proof: {0}")]
    InvalidProof(#[source] serde_json::Error),

    /// The claim part has the wrong shape.
    #[error("invalid claim: {0}")]
    InvalidClaim(#[source] serde_json::Error),
}

/// The credential subject: an identifier plus the asserted fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialSubject {
    pub id: SubjectId,

    #[serde(flatten)]
    pub fields: SubjectFields,
}

/// The signed content of a credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claim {
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    #[serde(rename = "type")]
    pub types: Vec<String>,

    pub issuer: IssuerId,

    #[serde(rename = "issuanceDate")]
    pub issuance_date: Timestamp,

    #[serde(rename = "credentialSubject")]
    pub credential_subject: CredentialSubject,
}

impl Claim {
    /// Canonical bytes of this claim: exactly what the issuer signs.
    pub fn signing_input(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::new(self)
    }
}

/// A claim with its proof attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credential {
    #[serde(flatten)]
    pub claim: Claim,

    pub proof: Proof,
}

impl Credential {
    /// Parse a credential from an already-decoded JSON tree.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let Value::Object(mut map) = value else {
            return Err(DocumentError::NotAnObject);
        };
        let proof = map.remove(PROOF_FIELD).ok_or(DocumentError::MissingProof)?;
        let proof: Proof = serde_json::from_value(proof).map_err(DocumentError::InvalidProof)?;
        let claim: Claim =
            serde_json::from_value(Value::Object(map)).map_err(DocumentError::InvalidClaim)?;
        Ok(Self { claim, proof })
    }

    /// Parse a credential from JSON text.
    pub fn from_json(input: &str) -> Result<Self, DocumentError> {
        Self::from_slice(input.as_bytes())
    }

    /// Parse a credential from JSON bytes.
    pub fn from_slice(input: &[u8]) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_slice(input).map_err(DocumentError::Json)?;
        Self::from_value(value)
    }

    /// Pretty-printed JSON, the form written to credential files.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The JSON tree of this credential.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl<'de> Deserialize<'de> for Credential {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// Canonical signing input of a credential document.
///
/// Removes `proof` from a copy of `document` (if present) and
/// canonicalizes the rest. The caller's value is not modified.
pub fn signing_input_of(document: &Value) -> Result<CanonicalBytes, CanonicalizationError> {
    let mut stripped = document.clone();
    if let Value::Object(map) = &mut stripped {
        map.remove(PROOF_FIELD);
    }
    CanonicalBytes::from_value(stripped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "type": ["VerifiableCredential", "CourseCertificate"],
            "issuer": "did:univ:1234",
            "issuanceDate": "2026-01-15T12:00:00Z",
            "credentialSubject": {
                "id": "did:student:5678",
                "name": "Alice",
                "course": "Systems Design",
                "grade": "A"
            },
            "proof": {
                "type": "Ed25519Signature2020",
                "created": "2026-01-15T12:00:00Z",
                "verificationMethod": "did:univ:1234#keys-1",
                "signatureValue": "00".repeat(64)
            }
        })
    }

    #[test]
    fn parse_sample() {
        let cred = Credential::from_value(sample()).unwrap();
        assert_eq!(cred.claim.issuer.as_str(), "did:univ:1234");
        assert_eq!(cred.claim.credential_subject.id.as_str(), "did:student:5678");
        assert_eq!(cred.claim.credential_subject.fields["grade"], json!("A"));
        assert_eq!(cred.proof.verification_method.as_str(), "did:univ:1234#keys-1");
    }

    #[test]
    fn serializes_flat() {
        let cred = Credential::from_value(sample()).unwrap();
        assert_eq!(cred.to_value().unwrap(), sample());
    }

    #[test]
    fn pretty_json_roundtrip() {
        let cred = Credential::from_value(sample()).unwrap();
        let text = cred.to_json_pretty().unwrap();
        assert!(text.contains('\n'));
        assert_eq!(Credential::from_json(&text).unwrap(), cred);
    }

    #[test]
    fn missing_proof_is_malformed() {
        let mut doc = sample();
        doc.as_object_mut().unwrap().remove("proof");
        assert!(matches!(
            Credential::from_value(doc),
            Err(DocumentError::MissingProof)
        ));
    }

    #[test]
    fn non_object_is_malformed() {
        assert!(matches!(
            Credential::from_value(json!([1, 2])),
            Err(DocumentError::NotAnObject)
        ));
        assert!(matches!(
            Credential::from_slice(b"{not json"),
            Err(DocumentError::Json(_))
        ));
    }

    #[test]
    fn unknown_top_level_field_is_malformed() {
        let mut doc = sample();
        doc["extra"] = json!("x");
        assert!(matches!(
            Credential::from_value(doc),
            Err(DocumentError::InvalidClaim(_))
        ));
    }

    #[test]
    fn subject_without_id_is_malformed() {
        let mut doc = sample();
        doc["credentialSubject"].as_object_mut().unwrap().remove("id");
        assert!(matches!(
            Credential::from_value(doc),
            Err(DocumentError::InvalidClaim(_))
        ));
    }

    #[test]
    fn offset_timestamp_is_malformed() {
        let mut doc = sample();
        doc["issuanceDate"] = json!("2026-01-15T12:00:00+00:00");
        assert!(Credential::from_value(doc).is_err());
    }

    #[test]
    fn signing_input_excludes_proof() {
        let doc = sample();
        let mut without = doc.clone();
        without.as_object_mut().unwrap().remove("proof");

        assert_eq!(
            signing_input_of(&doc).unwrap(),
            CanonicalBytes::from_value(without).unwrap()
        );
    }

    #[test]
    fn signing_input_ignores_injected_proof() {
        let mut doc = sample();
        doc.as_object_mut().unwrap().remove("proof");
        let before = signing_input_of(&doc).unwrap();

        doc["proof"] = json!({"type": "fake", "signatureValue": "deadbeef"});
        assert_eq!(signing_input_of(&doc).unwrap(), before);
    }

    #[test]
    fn signing_input_does_not_mutate_caller() {
        let doc = sample();
        let copy = doc.clone();
        signing_input_of(&doc).unwrap();
        assert_eq!(doc, copy);
    }

    #[test]
    fn typed_and_raw_signing_inputs_agree() {
        let doc = sample();
        let cred = Credential::from_value(doc.clone()).unwrap();
        assert_eq!(
            cred.claim.signing_input().unwrap(),
            signing_input_of(&doc).unwrap()
        );
    }

    #[test]
    fn signing_input_is_sorted_compact() {
        let doc = sample();
        let text = signing_input_of(&doc).unwrap().as_str().to_string();
        assert!(text.starts_with(r#"{"@context":["https://www.w3.org/2018/credentials/v1"],"credentialSubject":{"course":"Systems Design","grade":"A","id":"did:student:5678","name":"Alice"}"#));
        assert!(!text.contains("proof"));
    }
}
