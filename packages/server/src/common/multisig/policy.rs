use std::collections::{BTreeSet, HashMap};

use super::errors::{AuthorizationError, SecurityConfigError};
use super::keychain::{Keychain, SignerId};

/// Quorum policy of one scope: who may sign, and who must.
///
/// Invariant: `mandatory_signers ⊆ permitted_signers`, enforced by
/// [`ScopePolicy::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopePolicy {
    scope_name: String,
    permitted_signers: BTreeSet<SignerId>,
    mandatory_signers: BTreeSet<SignerId>,
}

impl ScopePolicy {
    pub fn new(
        scope_name: impl Into<String>,
        permitted_signers: impl IntoIterator<Item = SignerId>,
        mandatory_signers: impl IntoIterator<Item = SignerId>,
    ) -> Result<Self, SecurityConfigError> {
        let scope_name = scope_name.into();
        let permitted_signers: BTreeSet<SignerId> = permitted_signers.into_iter().collect();
        let mandatory_signers: BTreeSet<SignerId> = mandatory_signers.into_iter().collect();

        if permitted_signers.is_empty() {
            return Err(SecurityConfigError::EmptyScope { scope: scope_name });
        }
        if let Some(signer) = mandatory_signers.difference(&permitted_signers).next() {
            return Err(SecurityConfigError::MandatoryNotPermitted {
                scope: scope_name,
                signer: signer.to_string(),
            });
        }

        Ok(Self {
            scope_name,
            permitted_signers,
            mandatory_signers,
        })
    }

    pub fn scope_name(&self) -> &str {
        &self.scope_name
    }

    pub fn permitted_signers(&self) -> &BTreeSet<SignerId> {
        &self.permitted_signers
    }

    pub fn mandatory_signers(&self) -> &BTreeSet<SignerId> {
        &self.mandatory_signers
    }

    pub fn permits(&self, signer: &str) -> bool {
        self.permitted_signers.contains(signer)
    }
}

/// Process-wide map from scope name to quorum policy.
///
/// Built once at startup and never mutated, so concurrent reads need no lock.
#[derive(Debug, Clone, Default)]
pub struct ScopeRegistry {
    policies: HashMap<String, ScopePolicy>,
}

impl ScopeRegistry {
    pub fn new(policies: impl IntoIterator<Item = ScopePolicy>) -> Self {
        Self {
            policies: policies
                .into_iter()
                .map(|p| (p.scope_name.clone(), p))
                .collect(),
        }
    }

    /// Unknown scopes are a hard rejection.
    pub fn lookup(&self, scope_name: &str) -> Result<&ScopePolicy, AuthorizationError> {
        self.policies
            .get(scope_name)
            .ok_or_else(|| AuthorizationError::UnknownScope(scope_name.to_string()))
    }

    /// Every signer a policy names must have a verification key.
    pub fn check_keys(&self, keychain: &Keychain) -> Result<(), SecurityConfigError> {
        for policy in self.policies.values() {
            if let Some(signer) = policy
                .permitted_signers
                .iter()
                .find(|s| !keychain.contains(s.as_str()))
            {
                return Err(SecurityConfigError::SignerWithoutKey {
                    scope: policy.scope_name.clone(),
                    signer: signer.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn scope_names(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }
}
