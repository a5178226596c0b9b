//! Mapping of command failures onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::common::{AuthorizationError, CommandError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error(transparent)]
    Command(#[from] CommandError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Authorization(e) if e.is_policy_violation() => StatusCode::FORBIDDEN,
            ApiError::Authorization(_) => StatusCode::UNAUTHORIZED,
            ApiError::Command(CommandError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Command(CommandError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Command(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Record validation uses `errors`, everything else `error`
        let body = match &self {
            ApiError::Command(CommandError::Validation(errors)) => {
                json!({ "errors": errors.full_message() })
            }
            ApiError::Command(CommandError::Store(e)) => {
                error!(error = %e, "Management command failed in storage");
                json!({ "error": "Internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
