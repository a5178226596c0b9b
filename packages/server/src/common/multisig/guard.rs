use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

use super::canonical::PayloadHash;
use super::envelope::SignedEnvelope;
use super::errors::{AuthorizationError, SecurityConfigError};
use super::keychain::Keychain;
use super::policy::ScopeRegistry;
use super::quorum::{evaluate, AcceptedCommand};
use super::security_config::SecurityConfig;

/// Entry point for authorizing a signed management command.
///
/// Owns the keychain and scope registry, both immutable after construction.
#[derive(Debug, Clone)]
pub struct MultisigGuard {
    keychain: Keychain,
    registry: ScopeRegistry,
}

impl MultisigGuard {
    pub fn new(keychain: Keychain, registry: ScopeRegistry) -> Result<Self, SecurityConfigError> {
        registry.check_keys(&keychain)?;
        Ok(Self { keychain, registry })
    }

    pub fn from_config(config: &SecurityConfig) -> Result<Self, SecurityConfigError> {
        Self::new(config.build_keychain()?, config.build_registry()?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SecurityConfigError> {
        Self::from_config(&SecurityConfig::from_path(path)?)
    }

    pub fn registry(&self) -> &ScopeRegistry {
        &self.registry
    }

    /// Authorize `payload` for `scope` using the supplied envelopes.
    ///
    /// Rejections are logged with the scope, claimed signers and payload hash
    /// so they can be audited later. Signatures are never logged.
    pub fn authorize(
        &self,
        scope: &str,
        payload: Value,
        envelopes: &[SignedEnvelope],
        now: DateTime<Utc>,
    ) -> Result<AcceptedCommand, AuthorizationError> {
        let claimed_signers = envelopes
            .iter()
            .map(|e| e.signer.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let result = self
            .registry
            .lookup(scope)
            .and_then(|policy| evaluate(policy, &self.keychain, payload.clone(), envelopes, now));

        match &result {
            Ok(accepted) => info!(
                scope = %scope,
                signers = %accepted.signer_list(),
                payload_hash = %accepted.payload_hash,
                "Multisig quorum accepted"
            ),
            Err(e) => warn!(
                scope = %scope,
                signers = %claimed_signers,
                payload_hash = %PayloadHash::of(&payload).map(|h| h.to_hex()).unwrap_or_default(),
                reason = e.kind(),
                error = %e,
                "Multisig authorization rejected"
            ),
        }

        result
    }
}
