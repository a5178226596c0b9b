/// Multi-signature authorization for management commands
///
/// Every management request carries a set of signed envelopes. A request is
/// accepted only when all envelopes verify against the same canonical payload
/// and the signer set satisfies the scope's quorum policy:
///
/// ```rust,ignore
/// use crate::common::multisig::{MultisigGuard, WRITE_MEMBERS};
///
/// let accepted = guard.authorize(WRITE_MEMBERS, request.data, &request.signatures, Utc::now())?;
/// // accepted.payload is now safe to validate and execute
/// ```
///
/// Verification is fail-closed: one bad envelope rejects the whole request.

mod canonical;
mod envelope;
mod errors;
mod guard;
mod keychain;
mod policy;
mod quorum;
mod security_config;

pub use canonical::{canonical_json, PayloadHash};
pub use envelope::{verify_envelope, SignedEnvelope};
pub use errors::{AuthorizationError, SecurityConfigError};
pub use guard::MultisigGuard;
pub use keychain::{Keychain, SignerId};
pub use policy::{ScopePolicy, ScopeRegistry};
pub use quorum::{evaluate, AcceptedCommand};
pub use security_config::{KeyEntry, ScopeEntry, SecurityConfig};

/// Scope guarding member create/update and group changes.
pub const WRITE_MEMBERS: &str = "write_members";

/// Scope guarding transfer creation.
pub const WRITE_TRANSFERS: &str = "write_transfers";
