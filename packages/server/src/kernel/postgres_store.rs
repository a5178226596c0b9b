// PostgresStore - BaseStore backed by sqlx
//
// SQL lives on the models; this type only sequences it into transactions.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{BaseStore, StoreError};
use crate::domains::account::{Account, AccountKey};
use crate::domains::member::{Member, NewMember, UpsertedMember};
use crate::domains::transfer::{Ledger, Transfer, TransferPlan, TransferRejection};

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseStore for PostgresStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_member(&self, uid: &str) -> Result<Option<Member>, StoreError> {
        Ok(Member::find_by_uid(uid, &self.pool).await?)
    }

    async fn upsert_member(&self, member: &NewMember) -> Result<UpsertedMember, StoreError> {
        Ok(Member::upsert(member, &self.pool).await?)
    }

    async fn update_member_group(
        &self,
        uid: &str,
        group: &str,
    ) -> Result<Option<Member>, StoreError> {
        Ok(Member::update_group(uid, group, &self.pool).await?)
    }

    async fn find_account(&self, key: &AccountKey) -> Result<Option<Account>, StoreError> {
        Ok(Account::find(key, &self.pool).await?)
    }

    async fn find_transfer(&self, key: &str) -> Result<Option<Transfer>, StoreError> {
        Ok(Transfer::find_by_key(key, &self.pool).await?)
    }

    /// Runs the whole plan in one transaction. Returning early drops `tx`,
    /// which rolls back the key claim and any provisioned account.
    async fn execute_transfer(&self, plan: &TransferPlan) -> Result<Transfer, StoreError> {
        let mut tx = self.pool.begin().await?;

        let Some((transfer_id, created_at)) = Transfer::claim_key(plan, &mut *tx).await? else {
            return Err(TransferRejection::DuplicateKey.into());
        };

        // Sorted lock order keeps concurrent transfers over the same
        // accounts from deadlocking
        let mut existing = Vec::new();
        for key in plan.account_keys() {
            if let Some(account) = Account::lock(&key, &mut *tx).await? {
                existing.push(account);
            }
        }

        let known_members = Member::existing_uids(&plan.destination_uids(), &mut *tx)
            .await?
            .into_iter()
            .collect::<HashSet<_>>();

        let mut ledger = Ledger::new(existing);
        ledger.apply(plan, &known_members)?;

        for (key, entry) in ledger.changes() {
            match entry.account_id {
                Some(id) => Account::set_balance(id, entry.balance, &mut *tx).await?,
                None => {
                    debug!(account = %key, "Provisioning account");
                    Account::provision(key, entry.balance, &mut *tx).await?;
                }
            }
        }

        for (position, operation) in plan.operations.iter().enumerate() {
            Transfer::insert_operation(transfer_id, position, operation, &mut *tx).await?;
        }

        tx.commit().await?;

        Ok(Transfer::from_plan(transfer_id, plan, created_at))
    }
}
