//! # Identifier Newtypes
//!
//! Newtype wrappers for the identifiers that appear in a credential:
//! the issuer, the credential subject, and the verification method that
//! names the issuer's public key. You cannot pass a `SubjectId` where an
//! `IssuerId` is expected.
//!
//! ## Security Invariant
//!
//! Every constructor validates its input: identifiers are non-empty, carry
//! no leading/trailing whitespace and no control characters. A credential
//! with a blank issuer or subject can therefore never be assembled, let
//! alone signed.

use serde::{Deserialize, Serialize};

use crate::error::IdentifierError;

fn validate(kind: &'static str, value: &str) -> Result<(), IdentifierError> {
    if value.trim().is_empty() {
        return Err(IdentifierError::Empty { kind });
    }
    if value.trim() != value {
        return Err(IdentifierError::Invalid {
            kind,
            value: value.to_string(),
            reason: "leading or trailing whitespace",
        });
    }
    if value.chars().any(char::is_control) {
        return Err(IdentifierError::Invalid {
            kind,
            value: value.to_string(),
            reason: "control characters",
        });
    }
    Ok(())
}

/// Identifier of the credential issuer (e.g. `did:univ:1234`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IssuerId(String);

/// Identifier of the credential subject (e.g. `did:student:5678`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

/// Identifier of the key that signed a proof: `<issuer>#<key-id>`.
///
/// The fragment is the versioning hook for key rotation: a resolver can map
/// `did:univ:1234#keys-1` and `did:univ:1234#keys-2` to different public
/// keys without any change to the document format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VerificationMethodId(String);

impl IssuerId {
    /// Construct a validated issuer identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        validate("issuer id", &value)?;
        Ok(Self(value))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl SubjectId {
    /// Construct a validated subject identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        validate("subject id", &value)?;
        Ok(Self(value))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl VerificationMethodId {
    /// Build `<issuer>#<key_id>`.
    pub fn for_issuer(issuer: &IssuerId, key_id: &str) -> Result<Self, IdentifierError> {
        validate("key id", key_id)?;
        if key_id.contains('#') {
            return Err(IdentifierError::Invalid {
                kind: "key id",
                value: key_id.to_string(),
                reason: "must not contain '#'",
            });
        }
        Ok(Self(format!("{}#{key_id}", issuer.as_str())))
    }

    /// Parse a full verification method string.
    ///
    /// Requires exactly the `<controller>#<fragment>` shape with both parts
    /// non-empty.
    pub fn parse(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        validate("verification method", &value)?;
        match value.split_once('#') {
            Some((controller, fragment))
                if !controller.is_empty() && !fragment.is_empty() && !fragment.contains('#') =>
            {
                Ok(Self(value))
            }
            _ => Err(IdentifierError::Invalid {
                kind: "verification method",
                value,
                reason: "expected <issuer>#<key-id>",
            }),
        }
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The controller part (before `#`), normally the issuer identifier.
    pub fn controller(&self) -> &str {
        self.0.split_once('#').map(|(c, _)| c).unwrap_or(&self.0)
    }

    /// The key fragment (after `#`).
    pub fn key_id(&self) -> &str {
        self.0.split_once('#').map(|(_, k)| k).unwrap_or_default()
    }
}

macro_rules! string_newtype_impls {
    ($ty:ident, $ctor:path) => {
        impl TryFrom<String> for $ty {
            type Error = IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                $ctor(value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_newtype_impls!(IssuerId, IssuerId::new);
string_newtype_impls!(SubjectId, SubjectId::new);
string_newtype_impls!(VerificationMethodId, VerificationMethodId::parse);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issuer_id_accepts_did() {
        let id = IssuerId::new("did:univ:1234").unwrap();
        assert_eq!(id.as_str(), "did:univ:1234");
        assert_eq!(id.to_string(), "did:univ:1234");
    }

    #[test]
    fn empty_identifiers_rejected() {
        assert_eq!(
            IssuerId::new("").unwrap_err(),
            IdentifierError::Empty { kind: "issuer id" }
        );
        assert!(SubjectId::new("   ").is_err());
    }

    #[test]
    fn padded_identifiers_rejected() {
        assert!(SubjectId::new(" did:student:5678").is_err());
        assert!(IssuerId::new("did:univ:1234\n").is_err());
    }

    #[test]
    fn verification_method_for_issuer() {
        let issuer = IssuerId::new("did:univ:1234").unwrap();
        let vm = VerificationMethodId::for_issuer(&issuer, "keys-1").unwrap();
        assert_eq!(vm.as_str(), "did:univ:1234#keys-1");
        assert_eq!(vm.controller(), "did:univ:1234");
        assert_eq!(vm.key_id(), "keys-1");
    }

    #[test]
    fn verification_method_key_id_without_hash() {
        let issuer = IssuerId::new("did:univ:1234").unwrap();
        assert!(VerificationMethodId::for_issuer(&issuer, "a#b").is_err());
        assert!(VerificationMethodId::for_issuer(&issuer, "").is_err());
    }

    #[test]
    fn verification_method_parse_shapes() {
        assert!(VerificationMethodId::parse("did:univ:1234#keys-1").is_ok());
        assert!(VerificationMethodId::parse("did:univ:1234").is_err());
        assert!(VerificationMethodId::parse("#keys-1").is_err());
        assert!(VerificationMethodId::parse("did:univ:1234#").is_err());
        assert!(VerificationMethodId::parse("a#b#c").is_err());
    }

    #[test]
    fn serde_is_a_plain_string() {
        let id = SubjectId::new("did:student:5678").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""did:student:5678""#);
        let back: SubjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn serde_rejects_empty() {
        let result: Result<IssuerId, _> = serde_json::from_str(r#""""#);
        assert!(result.is_err());
    }
}
