// MemoryStore - in-process BaseStore for tests and local runs
//
// A single async mutex serializes every mutation. Transfers run through a
// Ledger against copies of the affected accounts and are written back only
// after every operation succeeded.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use super::{BaseStore, StoreError};
use crate::domains::account::{Account, AccountKey};
use crate::domains::member::{Member, NewMember, UpsertOutcome, UpsertedMember};
use crate::domains::transfer::{Ledger, Transfer, TransferPlan, TransferRejection};

#[derive(Default)]
struct State {
    next_id: i64,
    members: HashMap<String, Member>,
    accounts: BTreeMap<AccountKey, Account>,
    transfers: HashMap<String, Transfer>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account directly, creating it if needed.
    ///
    /// Seeds balances for transfers; management commands never call this.
    pub async fn deposit(&self, key: AccountKey, amount: Decimal) -> Account {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let id = state.next_id();
        let account = state.accounts.entry(key.clone()).or_insert_with(|| Account {
            id,
            member_uid: key.member_uid.clone(),
            currency: key.currency.clone(),
            code: key.code,
            balance: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        });
        account.balance += amount;
        account.updated_at = now;
        account.clone()
    }

    pub async fn account_count(&self) -> usize {
        self.state.lock().await.accounts.len()
    }

    pub async fn transfer_count(&self) -> usize {
        self.state.lock().await.transfers.len()
    }
}

#[async_trait]
impl BaseStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_member(&self, uid: &str) -> Result<Option<Member>, StoreError> {
        Ok(self.state.lock().await.members.get(uid).cloned())
    }

    async fn upsert_member(&self, input: &NewMember) -> Result<UpsertedMember, StoreError> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        if let Some(member) = state.members.get_mut(&input.uid) {
            input.apply_to(member, now);
            return Ok(UpsertedMember {
                member: member.clone(),
                outcome: UpsertOutcome::Updated,
            });
        }

        let id = state.next_id();
        let member = input.to_member(id, now);
        state.members.insert(member.uid.clone(), member.clone());
        Ok(UpsertedMember {
            member,
            outcome: UpsertOutcome::Created,
        })
    }

    async fn update_member_group(
        &self,
        uid: &str,
        group: &str,
    ) -> Result<Option<Member>, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state.members.get_mut(uid).map(|member| {
            member.group = group.to_string();
            member.updated_at = Utc::now();
            member.clone()
        }))
    }

    async fn find_account(&self, key: &AccountKey) -> Result<Option<Account>, StoreError> {
        Ok(self.state.lock().await.accounts.get(key).cloned())
    }

    async fn find_transfer(&self, key: &str) -> Result<Option<Transfer>, StoreError> {
        Ok(self.state.lock().await.transfers.get(key).cloned())
    }

    async fn execute_transfer(&self, plan: &TransferPlan) -> Result<Transfer, StoreError> {
        let mut state = self.state.lock().await;

        if state.transfers.contains_key(&plan.key) {
            return Err(TransferRejection::DuplicateKey.into());
        }

        let touched = plan
            .account_keys()
            .into_iter()
            .filter_map(|key| state.accounts.get(&key).cloned())
            .collect::<Vec<_>>();
        let known_members = plan
            .destination_uids()
            .into_iter()
            .filter(|uid| state.members.contains_key(uid))
            .collect::<HashSet<_>>();

        let mut ledger = Ledger::new(touched);
        ledger.apply(plan, &known_members)?;

        let now = Utc::now();
        for (key, entry) in ledger.changes() {
            let id = match entry.account_id {
                Some(id) => id,
                None => state.next_id(),
            };
            let account = state.accounts.entry(key.clone()).or_insert_with(|| Account {
                id,
                member_uid: key.member_uid.clone(),
                currency: key.currency.clone(),
                code: key.code,
                balance: Decimal::ZERO,
                created_at: now,
                updated_at: now,
            });
            account.balance = entry.balance;
            account.updated_at = now;
        }

        let id = state.next_id();
        let transfer = Transfer::from_plan(id, plan, now);
        state.transfers.insert(transfer.key.clone(), transfer.clone());
        Ok(transfer)
    }
}
