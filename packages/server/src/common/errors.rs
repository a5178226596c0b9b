use thiserror::Error;

use super::validation::ValidationErrors;
use crate::kernel::StoreError;

/// Failures of a command after it passed multisig authorization.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0} is missing")]
    MissingParameter(String),

    #[error("{0} is invalid")]
    InvalidParameter(String),

    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("record not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<ValidationErrors> for CommandError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
