use thiserror::Error;

/// Reasons a signed management request is rejected.
///
/// None of these are ever downgraded to validation errors; any one of them
/// rejects the command before a side effect happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("Unknown scope: {0}")]
    UnknownScope(String),

    #[error("Unknown signer: {0}")]
    UnknownSigner(String),

    #[error("Signature from {signer} has expired")]
    Expired { signer: String },

    #[error("Signature from {signer} does not match the submitted payload")]
    PayloadMismatch { signer: String },

    #[error("Invalid signature from {signer}")]
    BadSignature { signer: String },

    #[error("Malformed signature from {signer}: {reason}")]
    Malformed { signer: String, reason: String },

    #[error("No signatures supplied")]
    NoSignatures,

    #[error("Signers not permitted for this scope: {}", .0.join(", "))]
    SignerNotPermitted(Vec<String>),

    #[error("Missing mandatory signers: {}", .0.join(", "))]
    MissingMandatorySigner(Vec<String>),
}

impl AuthorizationError {
    /// Quorum policy failures, as opposed to envelope authentication failures.
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            Self::UnknownScope(_) | Self::SignerNotPermitted(_) | Self::MissingMandatorySigner(_)
        )
    }

    /// Short machine-readable name used in audit logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownScope(_) => "unknown_scope",
            Self::UnknownSigner(_) => "unknown_signer",
            Self::Expired { .. } => "expired",
            Self::PayloadMismatch { .. } => "payload_mismatch",
            Self::BadSignature { .. } => "bad_signature",
            Self::Malformed { .. } => "malformed",
            Self::NoSignatures => "no_signatures",
            Self::SignerNotPermitted(_) => "signer_not_permitted",
            Self::MissingMandatorySigner(_) => "missing_mandatory_signer",
        }
    }
}

/// Errors raised while loading the keychain and scope policies at startup.
#[derive(Error, Debug)]
pub enum SecurityConfigError {
    #[error("Failed to read security config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse security config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported key algorithm for signer {signer}: {algorithm}")]
    UnsupportedAlgorithm { signer: String, algorithm: String },

    #[error("Invalid public key for signer {signer}: {reason}")]
    InvalidKey { signer: String, reason: String },

    #[error("Scope {scope} has no permitted signers")]
    EmptyScope { scope: String },

    #[error("Scope {scope}: mandatory signer {signer} is not a permitted signer")]
    MandatoryNotPermitted { scope: String, signer: String },

    #[error("Scope {scope}: signer {signer} has no key in the keychain")]
    SignerWithoutKey { scope: String, signer: String },
}
