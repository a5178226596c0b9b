use axum::{extract::Extension, http::StatusCode, Json};
use chrono::Utc;

use crate::common::multisig::WRITE_TRANSFERS;
use crate::domains::transfer::actions::create_transfer;
use crate::domains::transfer::TransferData;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::routes::SignedRequest;

/// `POST /api/v2/management/transfers/new` - execute a multi-leg transfer
pub async fn create_transfer_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<SignedRequest>,
) -> Result<(StatusCode, Json<TransferData>), ApiError> {
    let deps = &state.server_deps;
    let accepted = deps
        .guard
        .authorize(WRITE_TRANSFERS, request.data, &request.signatures, Utc::now())?;

    let transfer = create_transfer(&accepted, deps).await?;
    Ok((StatusCode::CREATED, Json(transfer.into())))
}
