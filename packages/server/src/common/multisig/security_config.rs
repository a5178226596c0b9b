//! On-disk security configuration: signer keychain and scope policies.
//!
//! ```json
//! {
//!   "keychain": {
//!     "alex": { "algorithm": "ed25519", "value": "<base64 public key>" }
//!   },
//!   "scopes": {
//!     "write_members": { "permitted_signers": ["alex", "jeff"], "mandatory_signers": ["alex", "jeff"] }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};

use super::errors::SecurityConfigError;
use super::keychain::{Keychain, SignerId};
use super::policy::{ScopePolicy, ScopeRegistry};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyEntry {
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    pub value: String,
}

fn default_algorithm() -> String {
    "ed25519".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeEntry {
    pub permitted_signers: Vec<String>,
    #[serde(default)]
    pub mandatory_signers: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub keychain: BTreeMap<String, KeyEntry>,
    pub scopes: BTreeMap<String, ScopeEntry>,
}

impl SecurityConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SecurityConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SecurityConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, SecurityConfigError> {
        serde_json::from_str(raw).map_err(Into::into)
    }

    pub fn build_keychain(&self) -> Result<Keychain, SecurityConfigError> {
        let mut keychain = Keychain::new();
        for (signer, entry) in &self.keychain {
            if !entry.algorithm.eq_ignore_ascii_case("ed25519") {
                return Err(SecurityConfigError::UnsupportedAlgorithm {
                    signer: signer.clone(),
                    algorithm: entry.algorithm.clone(),
                });
            }
            keychain.insert(signer.as_str(), decode_public_key(signer, &entry.value)?);
        }
        Ok(keychain)
    }

    pub fn build_registry(&self) -> Result<ScopeRegistry, SecurityConfigError> {
        let policies = self
            .scopes
            .iter()
            .map(|(name, entry)| {
                ScopePolicy::new(
                    name.clone(),
                    entry.permitted_signers.iter().map(SignerId::new),
                    entry.mandatory_signers.iter().map(SignerId::new),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ScopeRegistry::new(policies))
    }
}

fn decode_public_key(signer: &str, value: &str) -> Result<VerifyingKey, SecurityConfigError> {
    let invalid = |reason: String| SecurityConfigError::InvalidKey {
        signer: signer.to_string(),
        reason,
    };

    let bytes = BASE64
        .decode(value.trim())
        .map_err(|e| invalid(format!("invalid base64: {}", e)))?;
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| invalid(format!("expected 32 bytes, got {}", b.len())))?;
    VerifyingKey::from_bytes(&bytes).map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;

    fn public_key_b64(seed: u8) -> String {
        BASE64.encode(SigningKey::from_bytes(&[seed; 32]).verifying_key().to_bytes())
    }

    fn sample() -> String {
        format!(
            r#"{{
                "keychain": {{
                    "alex": {{ "algorithm": "ed25519", "value": "{}" }},
                    "jeff": {{ "value": "{}" }}
                }},
                "scopes": {{
                    "write_members": {{ "permitted_signers": ["alex", "jeff"], "mandatory_signers": ["alex", "jeff"] }}
                }}
            }}"#,
            public_key_b64(1),
            public_key_b64(2)
        )
    }

    #[test]
    fn test_parse_and_build() {
        let config = SecurityConfig::from_json(&sample()).unwrap();
        let keychain = config.build_keychain().unwrap();
        let registry = config.build_registry().unwrap();

        assert_eq!(keychain.len(), 2);
        let policy = registry.lookup("write_members").unwrap();
        assert_eq!(policy.mandatory_signers().len(), 2);
    }

    #[test]
    fn test_rejects_unknown_algorithm() {
        let mut config = SecurityConfig::from_json(&sample()).unwrap();
        config.keychain.get_mut("alex").unwrap().algorithm = "RS256".to_string();

        assert!(matches!(
            config.build_keychain(),
            Err(SecurityConfigError::UnsupportedAlgorithm { .. })
        ));
    }

    #[test]
    fn test_rejects_short_key() {
        let mut config = SecurityConfig::from_json(&sample()).unwrap();
        config.keychain.get_mut("jeff").unwrap().value = BASE64.encode([1u8; 8]);

        assert!(matches!(
            config.build_keychain(),
            Err(SecurityConfigError::InvalidKey { .. })
        ));
    }
}
