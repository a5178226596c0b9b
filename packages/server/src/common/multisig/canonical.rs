//! Canonical payload encoding and hashing.
//!
//! Envelopes attest to a SHA-256 digest of the payload encoded as RFC 8785
//! canonical JSON (sorted keys, fixed number formatting, no whitespace), so
//! every signer hashes byte-identical input for the same logical payload.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Encode a value as canonical JSON bytes.
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_jcs::to_vec(value)
}

/// SHA-256 digest of a canonical payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PayloadHash([u8; 32]);

impl PayloadHash {
    /// Hash the canonical encoding of `payload`.
    pub fn of<T: Serialize + ?Sized>(payload: &T) -> Result<Self, serde_json::Error> {
        let bytes = canonical_json(payload)?;
        Ok(Self(Sha256::digest(&bytes).into()))
    }

    /// Parse a hex-encoded digest (case-insensitive).
    pub fn from_hex(value: &str) -> Result<Self, String> {
        let bytes = hex::decode(value).map_err(|e| format!("invalid hex payload hash: {}", e))?;
        let digest: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| format!("payload hash must be 32 bytes, got {}", b.len()))?;
        Ok(Self(digest))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for PayloadHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PayloadHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PayloadHash({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_order_does_not_change_hash() {
        let a: serde_json::Value =
            serde_json::from_str(r#"{"uid":"u1","email":"a@b.com","level":3}"#).unwrap();
        let b: serde_json::Value =
            serde_json::from_str(r#"{"level":3,"email":"a@b.com","uid":"u1"}"#).unwrap();

        assert_eq!(PayloadHash::of(&a).unwrap(), PayloadHash::of(&b).unwrap());
    }

    #[test]
    fn test_canonical_encoding_is_compact_and_sorted() {
        let bytes = canonical_json(&json!({"b": 1, "a": {"d": true, "c": "x"}})).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"a":{"c":"x","d":true},"b":1}"#
        );
    }

    #[test]
    fn test_different_payloads_hash_differently() {
        let a = PayloadHash::of(&json!({"uid": "u1", "group": "vip-1"})).unwrap();
        let b = PayloadHash::of(&json!({"uid": "u1", "group": "vip-2"})).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hex_round_trip_accepts_uppercase() {
        let hash = PayloadHash::of(&json!({"k": 1})).unwrap();
        let parsed = PayloadHash::from_hex(&hash.to_hex().to_uppercase()).unwrap();
        assert_eq!(parsed, hash);
    }

    #[test]
    fn test_from_hex_rejects_wrong_length() {
        assert!(PayloadHash::from_hex("abcd").is_err());
        assert!(PayloadHash::from_hex("not-hex").is_err());
    }
}
