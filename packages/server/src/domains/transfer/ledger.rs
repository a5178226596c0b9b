//! Pure balance bookkeeping for one transfer.
//!
//! Stores load the affected accounts, run the plan through a `Ledger` and
//! write back only the entries it changed. Nothing is written when `apply`
//! fails, so a rejected operation never leaves earlier legs applied.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::common::ValidationErrors;
use crate::domains::account::{Account, AccountKey};
use crate::domains::transfer::plan::TransferPlan;

/// Why a transfer could not be executed. No balance changed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferRejection {
    #[error("transfer key has already been taken")]
    DuplicateKey,

    #[error("operation {position}: source account {account} does not exist")]
    SourceAccountMissing { position: usize, account: AccountKey },

    #[error("operation {position}: account {account} holds {available}, {requested} requested")]
    InsufficientBalance {
        position: usize,
        account: AccountKey,
        available: Decimal,
        requested: Decimal,
    },

    #[error("operation {position}: member {uid} does not exist")]
    UnknownMember { position: usize, uid: String },
}

impl TransferRejection {
    /// Field errors reported to the caller
    pub fn to_validation_errors(&self) -> ValidationErrors {
        match self {
            Self::DuplicateKey => ValidationErrors::single("key", "has already been taken"),
            Self::SourceAccountMissing { .. } => {
                ValidationErrors::single("account_src", "does not exist")
            }
            Self::InsufficientBalance { .. } => {
                ValidationErrors::single("account_src", "has insufficient balance")
            }
            Self::UnknownMember { .. } => {
                ValidationErrors::single("account_dst", "member does not exist")
            }
        }
    }
}

/// Balance of one account while a transfer is applied
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    /// None for accounts provisioned by this transfer
    pub account_id: Option<i64>,
    pub opening: Decimal,
    pub balance: Decimal,
}

impl LedgerEntry {
    pub fn is_provisioned(&self) -> bool {
        self.account_id.is_none()
    }

    fn is_changed(&self) -> bool {
        self.is_provisioned() || self.balance != self.opening
    }
}

#[derive(Debug, Default)]
pub struct Ledger {
    entries: BTreeMap<AccountKey, LedgerEntry>,
}

impl Ledger {
    /// Start from the accounts that already exist.
    pub fn new(accounts: impl IntoIterator<Item = Account>) -> Self {
        let entries = accounts
            .into_iter()
            .map(|account| {
                (
                    account.key(),
                    LedgerEntry {
                        account_id: Some(account.id),
                        opening: account.balance,
                        balance: account.balance,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Apply every operation in order.
    ///
    /// Sources must exist before the transfer starts. A missing destination
    /// is provisioned with a zero balance when its member is in
    /// `known_members`.
    pub fn apply(
        &mut self,
        plan: &TransferPlan,
        known_members: &HashSet<String>,
    ) -> Result<(), TransferRejection> {
        for (position, operation) in plan.operations.iter().enumerate() {
            let source_key = operation.source_key();
            let source = match self.entries.get_mut(&source_key) {
                Some(entry) if !entry.is_provisioned() => entry,
                _ => {
                    return Err(TransferRejection::SourceAccountMissing {
                        position,
                        account: source_key,
                    })
                }
            };

            if source.balance < operation.amount {
                return Err(TransferRejection::InsufficientBalance {
                    position,
                    account: source_key,
                    available: source.balance,
                    requested: operation.amount,
                });
            }
            source.balance -= operation.amount;

            let destination_key = operation.destination_key();
            if !self.entries.contains_key(&destination_key) {
                if !known_members.contains(&operation.account_dst.uid) {
                    return Err(TransferRejection::UnknownMember {
                        position,
                        uid: operation.account_dst.uid.clone(),
                    });
                }
                self.entries.insert(
                    destination_key.clone(),
                    LedgerEntry {
                        account_id: None,
                        opening: Decimal::ZERO,
                        balance: Decimal::ZERO,
                    },
                );
            }
            if let Some(destination) = self.entries.get_mut(&destination_key) {
                destination.balance += operation.amount;
            }
        }

        Ok(())
    }

    /// Entries to write back: provisioned accounts and changed balances
    pub fn changes(&self) -> impl Iterator<Item = (&AccountKey, &LedgerEntry)> {
        self.entries.iter().filter(|(_, entry)| entry.is_changed())
    }

    pub fn balance(&self, key: &AccountKey) -> Option<Decimal> {
        self.entries.get(key).map(|entry| entry.balance)
    }
}
