use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

/// Identity of an account: one per member, currency and account code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountKey {
    pub member_uid: String,
    pub currency: String,
    pub code: i32,
}

impl AccountKey {
    pub fn new(member_uid: impl Into<String>, currency: impl Into<String>, code: i32) -> Self {
        Self {
            member_uid: member_uid.into(),
            currency: currency.into(),
            code,
        }
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.member_uid, self.currency, self.code)
    }
}

/// Account model - SQL persistence layer
///
/// Rows are provisioned with a zero balance the first time a transfer
/// credits them. Balances never go negative.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    #[serde(skip)]
    pub id: i64,
    pub member_uid: String,
    pub currency: String,
    pub code: i32,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn key(&self) -> AccountKey {
        AccountKey::new(self.member_uid.clone(), self.currency.clone(), self.code)
    }

    /// Find account by (member, currency, code)
    pub async fn find(key: &AccountKey, pool: &PgPool) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM accounts WHERE member_uid = $1 AND currency = $2 AND code = $3",
        )
        .bind(&key.member_uid)
        .bind(&key.currency)
        .bind(key.code)
        .fetch_optional(pool)
        .await
    }

    /// Find and row-lock an account for the rest of the transaction
    pub async fn lock(key: &AccountKey, conn: &mut PgConnection) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM accounts
             WHERE member_uid = $1 AND currency = $2 AND code = $3
             FOR UPDATE",
        )
        .bind(&key.member_uid)
        .bind(&key.currency)
        .bind(key.code)
        .fetch_optional(conn)
        .await
    }

    /// Overwrite the balance of a locked account
    pub async fn set_balance(
        id: i64,
        balance: Decimal,
        conn: &mut PgConnection,
    ) -> sqlx::Result<()> {
        sqlx::query("UPDATE accounts SET balance = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(balance)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Provision an account and credit it.
    ///
    /// If a concurrent transaction provisioned the same account first, the
    /// credit is added to its balance instead.
    pub async fn provision(
        key: &AccountKey,
        credit: Decimal,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO accounts (member_uid, currency, code, balance)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (member_uid, currency, code) DO UPDATE SET
                balance = accounts.balance + EXCLUDED.balance,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&key.member_uid)
        .bind(&key.currency)
        .bind(key.code)
        .bind(credit)
        .fetch_one(conn)
        .await
    }
}
