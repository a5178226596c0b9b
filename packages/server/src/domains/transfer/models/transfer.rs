use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::domains::account::AccountKey;
use crate::domains::transfer::plan::TransferPlan;

/// Member side of an operation leg: `{uid, code}`. The currency comes from
/// the operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    pub uid: String,
    pub code: i32,
}

/// One leg of a transfer: move `amount` of `currency` from src to dst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub currency: String,
    pub amount: Decimal,
    pub account_src: AccountRef,
    pub account_dst: AccountRef,
}

impl Operation {
    pub fn source_key(&self) -> AccountKey {
        AccountKey::new(self.account_src.uid.clone(), self.currency.clone(), self.account_src.code)
    }

    pub fn destination_key(&self) -> AccountKey {
        AccountKey::new(self.account_dst.uid.clone(), self.currency.clone(), self.account_dst.code)
    }
}

/// Transfer model - recorded only when all its operations committed
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub id: i64,
    pub key: String,
    pub category: String,
    pub description: String,
    pub operations: Vec<Operation>,
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct TransferRow {
    id: i64,
    key: String,
    category: String,
    description: String,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct OperationRow {
    currency: String,
    amount: Decimal,
    src_uid: String,
    src_code: i32,
    dst_uid: String,
    dst_code: i32,
}

impl From<OperationRow> for Operation {
    fn from(row: OperationRow) -> Self {
        Self {
            currency: row.currency,
            amount: row.amount,
            account_src: AccountRef {
                uid: row.src_uid,
                code: row.src_code,
            },
            account_dst: AccountRef {
                uid: row.dst_uid,
                code: row.dst_code,
            },
        }
    }
}

impl Transfer {
    pub fn from_plan(id: i64, plan: &TransferPlan, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            key: plan.key.clone(),
            category: plan.category.clone(),
            description: plan.description.clone(),
            operations: plan.operations.clone(),
            created_at,
        }
    }

    /// Find transfer by key, with its operations in order
    pub async fn find_by_key(key: &str, pool: &PgPool) -> sqlx::Result<Option<Self>> {
        let Some(row) =
            sqlx::query_as::<_, TransferRow>("SELECT * FROM transfers WHERE key = $1")
                .bind(key)
                .fetch_optional(pool)
                .await?
        else {
            return Ok(None);
        };

        let operations = sqlx::query_as::<_, OperationRow>(
            "SELECT currency, amount, src_uid, src_code, dst_uid, dst_code
             FROM transfer_operations
             WHERE transfer_id = $1
             ORDER BY position",
        )
        .bind(row.id)
        .fetch_all(pool)
        .await?;

        Ok(Some(Self {
            id: row.id,
            key: row.key,
            category: row.category,
            description: row.description,
            operations: operations.into_iter().map(Into::into).collect(),
            created_at: row.created_at,
        }))
    }

    /// Claim the transfer key inside a transaction.
    ///
    /// Returns None when the key is already taken; concurrent claims of the
    /// same key serialize on the unique index.
    pub async fn claim_key(
        plan: &TransferPlan,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Option<(i64, DateTime<Utc>)>> {
        sqlx::query_as::<_, (i64, DateTime<Utc>)>(
            r#"
            INSERT INTO transfers (key, category, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO NOTHING
            RETURNING id, created_at
            "#,
        )
        .bind(&plan.key)
        .bind(&plan.category)
        .bind(&plan.description)
        .fetch_optional(conn)
        .await
    }

    pub async fn insert_operation(
        transfer_id: i64,
        position: usize,
        operation: &Operation,
        conn: &mut PgConnection,
    ) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transfer_operations
                (transfer_id, position, currency, amount, src_uid, src_code, dst_uid, dst_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(transfer_id)
        .bind(position as i32)
        .bind(&operation.currency)
        .bind(operation.amount)
        .bind(&operation.account_src.uid)
        .bind(operation.account_src.code)
        .bind(&operation.account_dst.uid)
        .bind(operation.account_dst.code)
        .execute(conn)
        .await?;
        Ok(())
    }
}
