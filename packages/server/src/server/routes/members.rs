use axum::{extract::Extension, Json};
use chrono::Utc;

use crate::common::multisig::WRITE_MEMBERS;
use crate::domains::member::actions::{set_member_group, upsert_member};
use crate::domains::member::MemberData;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::routes::SignedRequest;

/// `POST /api/v2/management/members` - create or update a member
pub async fn upsert_member_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<SignedRequest>,
) -> Result<Json<MemberData>, ApiError> {
    let deps = &state.server_deps;
    let accepted = deps
        .guard
        .authorize(WRITE_MEMBERS, request.data, &request.signatures, Utc::now())?;

    let result = upsert_member(&accepted, deps).await?;
    Ok(Json(result.member.into()))
}

/// `POST /api/v2/management/members/group` - move a member to another group
pub async fn set_member_group_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<SignedRequest>,
) -> Result<Json<MemberData>, ApiError> {
    let deps = &state.server_deps;
    let accepted = deps
        .guard
        .authorize(WRITE_MEMBERS, request.data, &request.signatures, Utc::now())?;

    let member = set_member_group(&accepted, deps).await?;
    Ok(Json(member.into()))
}
