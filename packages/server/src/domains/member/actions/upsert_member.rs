//! Create-or-update member action

use tracing::{info, warn};

use crate::common::{AcceptedCommand, CommandError};
use crate::domains::member::commands::UpsertMemberCommand;
use crate::domains::member::models::UpsertedMember;
use crate::kernel::ServerDeps;

/// Create the member if `uid` is unknown, otherwise update its fields.
///
/// Field validation runs before any persistence. Submitting the same payload
/// twice leaves the record in the same state.
pub async fn upsert_member(
    command: &AcceptedCommand,
    deps: &ServerDeps,
) -> Result<UpsertedMember, CommandError> {
    let upsert = UpsertMemberCommand::parse(&command.payload)?;

    if let Err(errors) = upsert.validate(&deps.rules) {
        warn!(
            uid = %upsert.0.uid,
            signers = %command.signer_list(),
            payload_hash = %command.payload_hash,
            error = %errors,
            "Member upsert failed validation"
        );
        return Err(errors.into());
    }

    let result = deps.store.upsert_member(&upsert.0).await?;

    info!(
        uid = %result.member.uid,
        outcome = ?result.outcome,
        signers = %command.signer_list(),
        "Member upserted"
    );

    Ok(result)
}
