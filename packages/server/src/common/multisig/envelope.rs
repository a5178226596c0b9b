use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier};
use serde::{Deserialize, Serialize};

use super::canonical::{canonical_json, PayloadHash};
use super::errors::AuthorizationError;
use super::keychain::{Keychain, SignerId};

/// One operator's attestation over a canonical payload hash.
///
/// Wire form: `payload_hash` is hex, `signature` is base64, timestamps are
/// unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    pub signer: SignerId,
    pub payload_hash: String,
    pub signature: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Bytes covered by the signature. Binding the timestamps here means expiry
/// cannot be extended without re-signing.
#[derive(Serialize)]
struct SigningInput<'a> {
    signer: &'a str,
    payload_hash: &'a str,
    issued_at: i64,
    expires_at: i64,
}

fn signing_message(
    signer: &str,
    payload_hash: &PayloadHash,
    issued_at: i64,
    expires_at: i64,
) -> Result<Vec<u8>, serde_json::Error> {
    canonical_json(&SigningInput {
        signer,
        payload_hash: &payload_hash.to_hex(),
        issued_at,
        expires_at,
    })
}

impl SignedEnvelope {
    /// Sign `payload` on behalf of `signer`.
    pub fn sign<T: Serialize + ?Sized>(
        signer: impl Into<SignerId>,
        payload: &T,
        key: &SigningKey,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, serde_json::Error> {
        let signer = signer.into();
        let payload_hash = PayloadHash::of(payload)?;
        let message = signing_message(
            signer.as_str(),
            &payload_hash,
            issued_at.timestamp(),
            expires_at.timestamp(),
        )?;
        let signature = key.sign(&message);

        Ok(Self {
            signer,
            payload_hash: payload_hash.to_hex(),
            signature: BASE64.encode(signature.to_bytes()),
            issued_at: issued_at.timestamp(),
            expires_at: expires_at.timestamp(),
        })
    }

    fn malformed(&self, reason: impl Into<String>) -> AuthorizationError {
        AuthorizationError::Malformed {
            signer: self.signer.to_string(),
            reason: reason.into(),
        }
    }
}

/// Verify one envelope against the expected canonical payload hash.
///
/// Checks run in a fixed order and the first failure is returned:
/// known signer, expiry, payload hash, then the signature itself.
pub fn verify_envelope(
    envelope: &SignedEnvelope,
    expected: &PayloadHash,
    keychain: &Keychain,
    now: DateTime<Utc>,
) -> Result<SignerId, AuthorizationError> {
    let signer = envelope.signer.to_string();

    let key = keychain
        .get(envelope.signer.as_str())
        .ok_or_else(|| AuthorizationError::UnknownSigner(signer.clone()))?;

    if envelope.expires_at <= now.timestamp() {
        return Err(AuthorizationError::Expired { signer });
    }
    if envelope.issued_at > envelope.expires_at {
        return Err(envelope.malformed("issued_at is after expires_at"));
    }

    let attested =
        PayloadHash::from_hex(&envelope.payload_hash).map_err(|e| envelope.malformed(e))?;
    if attested != *expected {
        return Err(AuthorizationError::PayloadMismatch { signer });
    }

    let signature_bytes = BASE64
        .decode(&envelope.signature)
        .map_err(|e| envelope.malformed(format!("invalid base64 signature: {}", e)))?;
    let signature = Signature::from_slice(&signature_bytes)
        .map_err(|e| envelope.malformed(format!("invalid signature bytes: {}", e)))?;

    let message = signing_message(&signer, &attested, envelope.issued_at, envelope.expires_at)
        .map_err(|e| envelope.malformed(e.to_string()))?;

    key.verify(&message, &signature)
        .map_err(|_| AuthorizationError::BadSignature { signer })?;

    Ok(envelope.signer.clone())
}
