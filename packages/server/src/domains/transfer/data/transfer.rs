use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domains::transfer::models::{AccountRef, Operation, Transfer};

/// Transfer API data type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferData {
    pub key: String,
    pub category: String,
    pub description: String,
    pub operations: Vec<OperationData>,
    pub created_at: DateTime<Utc>,
}

/// Amounts serialize as decimal strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationData {
    pub currency: String,
    pub amount: Decimal,
    pub account_src: AccountRef,
    pub account_dst: AccountRef,
}

impl From<Operation> for OperationData {
    fn from(operation: Operation) -> Self {
        Self {
            currency: operation.currency,
            amount: operation.amount,
            account_src: operation.account_src,
            account_dst: operation.account_dst,
        }
    }
}

impl From<Transfer> for TransferData {
    fn from(transfer: Transfer) -> Self {
        Self {
            key: transfer.key,
            category: transfer.category,
            description: transfer.description,
            operations: transfer.operations.into_iter().map(Into::into).collect(),
            created_at: transfer.created_at,
        }
    }
}
