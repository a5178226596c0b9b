use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};

/// Opaque operator identity (e.g. `alex`), mapped 1:1 to a verification key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignerId(String);

impl SignerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SignerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SignerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Pre-provisioned public keys of every known signer.
///
/// Read-only after startup; shared across requests behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Keychain {
    keys: HashMap<SignerId, VerifyingKey>,
}

impl Keychain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, signer: impl Into<SignerId>, key: VerifyingKey) -> Self {
        self.insert(signer, key);
        self
    }

    pub fn insert(&mut self, signer: impl Into<SignerId>, key: VerifyingKey) {
        self.keys.insert(signer.into(), key);
    }

    pub fn get(&self, signer: &str) -> Option<&VerifyingKey> {
        self.keys.get(signer)
    }

    pub fn contains(&self, signer: &str) -> bool {
        self.keys.contains_key(signer)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
