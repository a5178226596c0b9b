// Common types and utilities shared across the application

pub mod errors;
pub mod multisig;
pub mod payload;
pub mod validation;

pub use errors::CommandError;
pub use multisig::{AcceptedCommand, AuthorizationError, MultisigGuard, SignedEnvelope};
pub use payload::PayloadReader;
pub use validation::{ValidationErrors, ValidationRules};
