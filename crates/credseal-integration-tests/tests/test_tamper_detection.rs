//! # Tamper Detection
//!
//! Any single-character change to any signed subject field must invalidate
//! the signature, and additions or removals anywhere in the claim must too.

use credseal_core::IssuerId;
use credseal_crypto::{Ed25519KeyPair, KeyHandle};
use credseal_vc::{
    CredentialIssuer, CredentialVerifier, IssuerProfile, SubjectFields, TrustStore,
    VerificationResult,
};
use serde_json::{json, Value};

fn setup() -> (CredentialIssuer, CredentialVerifier<TrustStore>) {
    let key = KeyHandle::from_keypair(Ed25519KeyPair::generate());
    let profile = IssuerProfile::new(IssuerId::new("did:univ:1234").unwrap(), "keys-1").unwrap();
    let trust = TrustStore::single(profile.verification_method.clone(), &key);
    (CredentialIssuer::new(profile, key), CredentialVerifier::new(trust))
}

fn fields() -> SubjectFields {
    [
        ("name", "Alice"),
        ("course", "Systems Design"),
        ("grade", "A"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), json!(v)))
    .collect()
}

fn mutate_char(s: &str, at: usize) -> String {
    s.chars()
        .enumerate()
        .map(|(i, c)| {
            if i != at {
                c
            } else if c == 'x' {
                'y'
            } else {
                'x'
            }
        })
        .collect()
}

#[test]
fn every_character_of_every_field_is_covered() {
    let (issuer, verifier) = setup();
    let doc = issuer
        .issue("did:student:5678", fields())
        .unwrap()
        .to_value()
        .unwrap();

    let subject = doc["credentialSubject"].as_object().unwrap().clone();
    for (name, value) in &subject {
        let text = value.as_str().unwrap();
        for at in 0..text.chars().count() {
            let mut tampered = doc.clone();
            tampered["credentialSubject"][name.as_str()] = json!(mutate_char(text, at));
            let result = verifier.verify(&tampered);
            // Changing the subject id can also break id validation; either
            // way the credential must not verify.
            assert!(
                !result.is_valid(),
                "changing {name}[{at}] went unnoticed"
            );
            if name != "id" {
                assert_eq!(result, VerificationResult::InvalidSignature);
            }
        }
    }
}

#[test]
fn removing_a_field_is_detected() {
    let (issuer, verifier) = setup();
    let doc = issuer.issue("did:student:5678", fields()).unwrap().to_value().unwrap();
    for name in ["name", "course", "grade"] {
        let mut tampered = doc.clone();
        tampered["credentialSubject"].as_object_mut().unwrap().remove(name);
        assert_eq!(verifier.verify(&tampered), VerificationResult::InvalidSignature);
    }
}

#[test]
fn reordering_keys_is_not_tampering() {
    let (issuer, verifier) = setup();
    let doc = issuer.issue("did:student:5678", fields()).unwrap().to_value().unwrap();

    // Rebuild the document by hand with keys written in reverse order.
    let text = serde_json::to_string(&doc).unwrap();
    let reversed = reverse_keys(&serde_json::from_str::<Value>(&text).unwrap());
    assert_eq!(
        verifier.verify_json(reversed.as_bytes()),
        VerificationResult::Valid
    );
}

fn reverse_keys(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let members: Vec<String> = map
                .iter()
                .rev()
                .map(|(k, v)| format!("{}:{}", json!(k), reverse_keys(v)))
                .collect();
            format!("{{{}}}", members.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(reverse_keys).collect();
            format!("[{}]", items.join(","))
        }
        other => other.to_string(),
    }
}
