use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::common::validation::{DEFAULT_GROUP, DEFAULT_STATE};

/// Member model - SQL persistence layer
///
/// Keyed by `uid`; the numeric id never leaves the database layer.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Member {
    pub id: i64,
    pub uid: String,
    pub email: String,
    pub level: i32,
    pub role: String,
    #[sqlx(rename = "member_group")]
    pub group: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields of a member create/update command.
///
/// `group` and `state` are optional: absent on create means the default,
/// absent on update means unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub uid: String,
    pub email: String,
    pub level: i32,
    pub role: String,
    pub group: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

#[derive(Debug, Clone)]
pub struct UpsertedMember {
    pub member: Member,
    pub outcome: UpsertOutcome,
}

#[derive(sqlx::FromRow)]
struct UpsertRow {
    #[sqlx(flatten)]
    member: Member,
    inserted: bool,
}

impl NewMember {
    /// Build a fresh record for an insert, applying defaults.
    pub fn to_member(&self, id: i64, now: DateTime<Utc>) -> Member {
        Member {
            id,
            uid: self.uid.clone(),
            email: self.email.clone(),
            level: self.level,
            role: self.role.clone(),
            group: self.group.clone().unwrap_or_else(|| DEFAULT_GROUP.to_string()),
            state: self.state.clone().unwrap_or_else(|| DEFAULT_STATE.to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the supplied fields onto an existing record.
    pub fn apply_to(&self, member: &mut Member, now: DateTime<Utc>) {
        member.email = self.email.clone();
        member.level = self.level;
        member.role = self.role.clone();
        if let Some(group) = &self.group {
            member.group = group.clone();
        }
        if let Some(state) = &self.state {
            member.state = state.clone();
        }
        member.updated_at = now;
    }
}

impl Member {
    /// Find member by uid
    pub async fn find_by_uid(uid: &str, pool: &PgPool) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM members WHERE uid = $1")
            .bind(uid)
            .fetch_optional(pool)
            .await
    }

    /// Insert or update by uid in a single statement.
    ///
    /// `xmax = 0` only holds for rows inserted by this statement, which tells
    /// a create apart from an update.
    pub async fn upsert(input: &NewMember, pool: &PgPool) -> sqlx::Result<UpsertedMember> {
        let row = sqlx::query_as::<_, UpsertRow>(
            r#"
            INSERT INTO members (uid, email, level, role, member_group, state)
            VALUES ($1, $2, $3, $4, COALESCE($5, $7), COALESCE($6, $8))
            ON CONFLICT (uid) DO UPDATE SET
                email = EXCLUDED.email,
                level = EXCLUDED.level,
                role = EXCLUDED.role,
                member_group = COALESCE($5, members.member_group),
                state = COALESCE($6, members.state),
                updated_at = NOW()
            RETURNING *, (xmax = 0) AS inserted
            "#,
        )
        .bind(&input.uid)
        .bind(&input.email)
        .bind(input.level)
        .bind(&input.role)
        .bind(&input.group)
        .bind(&input.state)
        .bind(DEFAULT_GROUP)
        .bind(DEFAULT_STATE)
        .fetch_one(pool)
        .await?;

        Ok(UpsertedMember {
            member: row.member,
            outcome: if row.inserted {
                UpsertOutcome::Created
            } else {
                UpsertOutcome::Updated
            },
        })
    }

    /// Update member group
    pub async fn update_group(uid: &str, group: &str, pool: &PgPool) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE members SET member_group = $2, updated_at = NOW() WHERE uid = $1 RETURNING *",
        )
        .bind(uid)
        .bind(group)
        .fetch_optional(pool)
        .await
    }

    /// Which of `uids` belong to existing members (used inside a transfer transaction)
    pub async fn existing_uids(
        uids: &[String],
        conn: &mut PgConnection,
    ) -> sqlx::Result<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT uid FROM members WHERE uid = ANY($1) FOR SHARE")
            .bind(uids)
            .fetch_all(conn)
            .await
    }
}
