//! Set member group action

use tracing::{info, warn};

use crate::common::{AcceptedCommand, CommandError};
use crate::domains::member::commands::SetGroupCommand;
use crate::domains::member::models::Member;
use crate::kernel::ServerDeps;

/// Move a member to another group.
///
/// The uid is resolved before the group value is read, so an unknown
/// member is reported as not found even when the group is missing or invalid.
pub async fn set_member_group(
    command: &AcceptedCommand,
    deps: &ServerDeps,
) -> Result<Member, CommandError> {
    let uid = SetGroupCommand::target_uid(&command.payload)?;

    if deps.store.find_member(&uid).await?.is_none() {
        warn!(
            uid = %uid,
            signers = %command.signer_list(),
            payload_hash = %command.payload_hash,
            "Group change for unknown member"
        );
        return Err(CommandError::NotFound);
    }

    let set_group = SetGroupCommand::parse(&command.payload)?;
    set_group.validate()?;

    // Row may have vanished between lookup and update
    let member = deps
        .store
        .update_member_group(&set_group.uid, &set_group.group)
        .await?
        .ok_or(CommandError::NotFound)?;

    info!(
        uid = %member.uid,
        group = %member.group,
        signers = %command.signer_list(),
        "Member group updated"
    );

    Ok(member)
}
