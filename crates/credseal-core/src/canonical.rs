//! # Canonical Serialization — JCS Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! that are signed at issuance and verified afterwards.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only ways to
//! construct it are [`CanonicalBytes::new()`] and
//! [`CanonicalBytes::from_value()`], both of which run the same validation
//! pass and then serialize with `serde_jcs` (RFC 8785): object keys sorted
//! lexicographically at every depth, compact separators, UTF-8 output.
//!
//! Because signing (`Ed25519KeyPair::sign`) and verification
//! (`verify_with_public_key`) only accept `&CanonicalBytes`, the issuer and
//! the verifier cannot drift onto different serializations of the same claim.
//!
//! ## Validation Rules
//!
//! 1. `bool`, `string`, finite numbers — pass through unchanged.
//! 2. `null` — **rejected** with [`CanonicalizationError::NullValue`]. An
//!    absent value is a caller error, never something the canonical form
//!    silently encodes. Non-finite floats reach this rule too, since
//!    `serde_json` maps them to `null`.
//! 3. `object` — values recursed; keys are already strings.
//! 4. `array` — elements recursed, order preserved.
//!
//! Values whose `Serialize` impl cannot produce JSON at all (maps keyed by
//! non-strings, byte blobs behind a failing impl) are reported as
//! [`CanonicalizationError::Serialization`].

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization of a validated JSON tree.
///
/// # Invariants
///
/// - Constructed only via [`CanonicalBytes::new()`] or [`CanonicalBytes::from_value()`].
/// - Contains no `null` anywhere in the tree.
/// - Keys sorted at every level; compact separators (RFC 8785).
///
/// These invariants cannot be violated downstream because the inner
/// `Vec<u8>` is private.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::Serialization` if the value cannot be
    /// converted to JSON, and `CanonicalizationError::NullValue` if the tree
    /// contains `null`.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        Self::from_value(value)
    }

    /// Construct canonical bytes from an already-parsed JSON tree.
    ///
    /// This is the entry point used on the verification side, where the
    /// document arrives as JSON and must be canonicalized without a typed
    /// round-trip that could drop or reorder content.
    pub fn from_value(value: Value) -> Result<Self, CanonicalizationError> {
        let mut path = String::new();
        validate_json_value(&value, &mut path)?;
        let bytes = serde_jcs::to_vec(&value)?;
        Ok(Self(bytes))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// View the canonical bytes as UTF-8 text.
    ///
    /// JCS output is always valid UTF-8; the fallback is unreachable in
    /// practice but avoids a panic path.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Walk the JSON tree, rejecting `null` and recording where it was found.
///
/// `path` is a JSON-pointer style location (`/credentialSubject/grade`),
/// extended and truncated in place while recursing.
fn validate_json_value(value: &Value, path: &mut String) -> Result<(), CanonicalizationError> {
    match value {
        Value::Bool(_) | Value::String(_) | Value::Number(_) => Ok(()),
        Value::Null => Err(CanonicalizationError::NullValue {
            path: display_path(path),
        }),
        Value::Object(map) => {
            for (k, v) in map {
                let mark = path.len();
                path.push('/');
                push_escaped(path, k);
                validate_json_value(v, path)?;
                path.truncate(mark);
            }
            Ok(())
        }
        Value::Array(arr) => {
            for (i, v) in arr.iter().enumerate() {
                let mark = path.len();
                path.push('/');
                path.push_str(&i.to_string());
                validate_json_value(v, path)?;
                path.truncate(mark);
            }
            Ok(())
        }
    }
}

fn push_escaped(path: &mut String, key: &str) {
    for c in key.chars() {
        match c {
            '~' => path.push_str("~0"),
            '/' => path.push_str("~1"),
            other => path.push(other),
        }
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn test_canonical_bytes_simple_dict() {
        let data = serde_json::json!({"b": 2, "a": 1, "c": "hello"});
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        assert_eq!(cb.as_str(), r#"{"a":1,"b":2,"c":"hello"}"#);
    }

    #[test]
    fn test_canonical_bytes_nested() {
        let data = serde_json::json!({
            "outer": {"b": 2, "a": 1},
            "list": [3, 2, 1]
        });
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        // Nested objects also have sorted keys; arrays keep their order.
        assert_eq!(cb.as_str(), r#"{"list":[3,2,1],"outer":{"a":1,"b":2}}"#);
    }

    #[test]
    fn test_at_context_sorts_before_letters() {
        let data = serde_json::json!({
            "type": ["VerifiableCredential"],
            "issuer": "did:univ:1234",
            "@context": ["https://www.w3.org/2018/credentials/v1"],
        });
        let cb = CanonicalBytes::new(&data).unwrap();
        assert!(cb.as_str().starts_with(r#"{"@context":"#));
    }

    /// An object that serializes its members in the given order.
    pub(super) struct Ordered(pub(super) Vec<(String, String)>);

    impl Serialize for Ordered {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            use serde::ser::SerializeMap;
            let mut map = serializer.serialize_map(Some(self.0.len()))?;
            for (k, v) in &self.0 {
                map.serialize_entry(k, v)?;
            }
            map.end()
        }
    }

    fn ordered(pairs: &[(&str, &str)]) -> Ordered {
        Ordered(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn test_insertion_order_irrelevant() {
        let a = ordered(&[("name", "Alice"), ("course", "Systems Design"), ("grade", "A")]);
        let b = ordered(&[("grade", "A"), ("name", "Alice"), ("course", "Systems Design")]);
        assert_ne!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );

        let ca = CanonicalBytes::new(&a).unwrap();
        let cb = CanonicalBytes::new(&b).unwrap();
        assert_eq!(ca, cb);
        assert_eq!(ca.as_str(), r#"{"course":"Systems Design","grade":"A","name":"Alice"}"#);
    }

    #[test]
    fn test_hashmap_and_btreemap_agree() {
        let mut h = HashMap::new();
        let mut t = BTreeMap::new();
        for (k, v) in [("z", "1"), ("m", "2"), ("a", "3")] {
            h.insert(k, v);
            t.insert(k, v);
        }
        assert_eq!(CanonicalBytes::new(&h).unwrap(), CanonicalBytes::new(&t).unwrap());
    }

    #[test]
    fn test_null_rejected_with_path() {
        let data = serde_json::json!({"credentialSubject": {"grade": null}});
        match CanonicalBytes::new(&data) {
            Err(CanonicalizationError::NullValue { path }) => {
                assert_eq!(path, "/credentialSubject/grade");
            }
            other => panic!("expected NullValue, got: {other:?}"),
        }
    }

    #[test]
    fn test_null_in_array_reports_index() {
        let data = serde_json::json!({"type": ["VerifiableCredential", null]});
        match CanonicalBytes::new(&data) {
            Err(CanonicalizationError::NullValue { path }) => assert_eq!(path, "/type/1"),
            other => panic!("expected NullValue, got: {other:?}"),
        }
    }

    #[test]
    fn test_top_level_null_rejected() {
        assert!(matches!(
            CanonicalBytes::from_value(Value::Null),
            Err(CanonicalizationError::NullValue { .. })
        ));
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let mut data = BTreeMap::new();
        data.insert("score", f64::NAN);
        assert!(CanonicalBytes::new(&data).is_err());
    }

    #[test]
    fn test_non_string_map_keys_rejected() {
        let mut data = HashMap::new();
        data.insert(vec![1u8, 2], "blob");
        assert!(matches!(
            CanonicalBytes::new(&data),
            Err(CanonicalizationError::Serialization(_))
        ));
    }

    #[test]
    fn test_numbers_and_bools_accepted() {
        let data = serde_json::json!({"credits": 4, "score": 91.5, "passed": true, "delta": -3});
        let cb = CanonicalBytes::new(&data).expect("numbers should be accepted");
        assert_eq!(cb.as_str(), r#"{"credits":4,"delta":-3,"passed":true,"score":91.5}"#);
    }

    #[test]
    fn test_pointer_escaping() {
        let data = serde_json::json!({"a/b": {"c~d": null}});
        match CanonicalBytes::new(&data) {
            Err(CanonicalizationError::NullValue { path }) => assert_eq!(path, "/a~1b/c~0d"),
            other => panic!("expected NullValue, got: {other:?}"),
        }
    }

    #[test]
    fn test_empty_object() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(cb.as_bytes(), b"{}");
        assert!(!cb.is_empty());
    }

    #[test]
    fn test_unicode_passthrough() {
        // Non-ASCII characters are emitted as UTF-8, not \u escapes.
        let data = serde_json::json!({"name": "Zoë Ångström"});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_str(), "{\"name\":\"Zoë Ångström\"}");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use super::tests::Ordered;
    use proptest::prelude::*;

    /// Strategy for generating null-free JSON trees.
    fn json_value_no_nulls() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9_ ]{0,30}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::btree_map("[a-z@]{1,8}", inner, 0..6).prop_map(|m| {
                    Value::Object(m.into_iter().collect())
                }),
            ]
        })
    }

    proptest! {
        #[test]
        fn canonical_bytes_never_fail_without_nulls(value in json_value_no_nulls()) {
            let result = CanonicalBytes::from_value(value);
            prop_assert!(result.is_ok(), "Canonicalization failed: {:?}", result.err());
        }

        #[test]
        fn canonical_bytes_are_a_fixed_point(value in json_value_no_nulls()) {
            // Re-parsing canonical output and canonicalizing again is a no-op.
            let first = CanonicalBytes::from_value(value).unwrap();
            let reparsed: Value = serde_json::from_slice(first.as_bytes()).unwrap();
            let second = CanonicalBytes::from_value(reparsed).unwrap();
            prop_assert_eq!(first.as_bytes(), second.as_bytes());
        }

        #[test]
        fn reversed_insertion_order_is_byte_identical(
            entries in prop::collection::btree_map("[a-z]{1,8}", "[a-zA-Z ]{0,12}", 1..8)
        ) {
            let forward = Ordered(entries.clone().into_iter().collect());
            let backward = Ordered(entries.into_iter().rev().collect());
            let a = CanonicalBytes::new(&forward).unwrap();
            let b = CanonicalBytes::new(&backward).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
