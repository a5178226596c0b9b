// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Validation and quorum checks happen before anything reaches a store.
//
// Naming convention: Base* for trait names (e.g., BaseStore)

use async_trait::async_trait;
use thiserror::Error;

use crate::domains::account::{Account, AccountKey};
use crate::domains::member::{Member, NewMember, UpsertedMember};
use crate::domains::transfer::{Transfer, TransferPlan, TransferRejection};

// =============================================================================
// Store errors
// =============================================================================

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Transfer rejected: {0}")]
    TransferRejected(TransferRejection),
}

impl From<TransferRejection> for StoreError {
    fn from(rejection: TransferRejection) -> Self {
        Self::TransferRejected(rejection)
    }
}

// =============================================================================
// Store Trait (Infrastructure - Member/Account/Transfer persistence)
// =============================================================================

/// Persistence for members, accounts and transfers.
///
/// Every mutating method is one atomic unit: it either fully applies or
/// leaves no trace. Implementations serialize concurrent mutations of the
/// same member or account.
#[async_trait]
pub trait BaseStore: Send + Sync {
    /// Check that the backend is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    async fn find_member(&self, uid: &str) -> Result<Option<Member>, StoreError>;

    /// Create the member, or overwrite the supplied fields of an existing one
    async fn upsert_member(&self, member: &NewMember) -> Result<UpsertedMember, StoreError>;

    /// Returns None if no member has this uid
    async fn update_member_group(
        &self,
        uid: &str,
        group: &str,
    ) -> Result<Option<Member>, StoreError>;

    async fn find_account(&self, key: &AccountKey) -> Result<Option<Account>, StoreError>;

    async fn find_transfer(&self, key: &str) -> Result<Option<Transfer>, StoreError>;

    /// Apply every operation of the plan, provision missing destination
    /// accounts and record the transfer, all in one transaction.
    async fn execute_transfer(&self, plan: &TransferPlan) -> Result<Transfer, StoreError>;
}
