//! Create transfer action

use tracing::{info, warn};

use crate::common::{AcceptedCommand, CommandError};
use crate::domains::transfer::commands::CreateTransferCommand;
use crate::domains::transfer::models::Transfer;
use crate::kernel::{ServerDeps, StoreError};

/// Validate the transfer and execute it as one unit of work.
///
/// Balance and key failures found while executing are reported as
/// validation errors. Either way the store is left untouched.
pub async fn create_transfer(
    command: &AcceptedCommand,
    deps: &ServerDeps,
) -> Result<Transfer, CommandError> {
    let create = CreateTransferCommand::parse(&command.payload)?;

    if let Err(errors) = create.validate(&deps.rules) {
        warn!(
            key = %create.0.key,
            signers = %command.signer_list(),
            payload_hash = %command.payload_hash,
            error = %errors,
            "Transfer failed validation"
        );
        return Err(errors.into());
    }

    let plan = create.into_plan();
    match deps.store.execute_transfer(&plan).await {
        Ok(transfer) => {
            info!(
                key = %transfer.key,
                category = %transfer.category,
                operations = transfer.operations.len(),
                signers = %command.signer_list(),
                "Transfer executed"
            );
            Ok(transfer)
        }
        Err(StoreError::TransferRejected(rejection)) => {
            warn!(
                key = %plan.key,
                signers = %command.signer_list(),
                payload_hash = %command.payload_hash,
                reason = %rejection,
                "Transfer rejected"
            );
            Err(rejection.to_validation_errors().into())
        }
        Err(e) => Err(e.into()),
    }
}
