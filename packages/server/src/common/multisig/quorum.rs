use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::canonical::PayloadHash;
use super::envelope::{verify_envelope, SignedEnvelope};
use super::errors::AuthorizationError;
use super::keychain::{Keychain, SignerId};
use super::policy::ScopePolicy;

/// A payload that passed quorum for its scope.
///
/// Only values of this type reach the command validators and executors.
#[derive(Debug, Clone)]
pub struct AcceptedCommand {
    pub scope: String,
    pub payload: Value,
    pub payload_hash: PayloadHash,
    pub signers: BTreeSet<SignerId>,
}

impl AcceptedCommand {
    /// Comma-separated signer list for log fields.
    pub fn signer_list(&self) -> String {
        self.signers
            .iter()
            .map(SignerId::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Decide whether `envelopes` form a quorum over `payload` under `policy`.
///
/// The whole collection is judged at once: every envelope must verify
/// against the same canonical payload hash, the signer set must be a subset
/// of the permitted signers, and must contain every mandatory signer.
/// Repeated envelopes from one signer count once.
pub fn evaluate(
    policy: &ScopePolicy,
    keychain: &Keychain,
    payload: Value,
    envelopes: &[SignedEnvelope],
    now: DateTime<Utc>,
) -> Result<AcceptedCommand, AuthorizationError> {
    if envelopes.is_empty() {
        return Err(AuthorizationError::NoSignatures);
    }

    let payload_hash = PayloadHash::of(&payload).map_err(|e| AuthorizationError::Malformed {
        signer: String::new(),
        reason: format!("payload cannot be canonicalized: {}", e),
    })?;

    let signers = envelopes
        .iter()
        .map(|envelope| verify_envelope(envelope, &payload_hash, keychain, now))
        .collect::<Result<BTreeSet<SignerId>, _>>()?;

    let not_permitted: Vec<String> = signers
        .iter()
        .filter(|s| !policy.permits(s.as_str()))
        .map(ToString::to_string)
        .collect();
    if !not_permitted.is_empty() {
        return Err(AuthorizationError::SignerNotPermitted(not_permitted));
    }

    let missing: Vec<String> = policy
        .mandatory_signers()
        .difference(&signers)
        .map(ToString::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(AuthorizationError::MissingMandatorySigner(missing));
    }

    Ok(AcceptedCommand {
        scope: policy.scope_name().to_string(),
        payload,
        payload_hash,
        signers,
    })
}
