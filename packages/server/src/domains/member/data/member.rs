use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domains::member::models::member::Member as MemberModel;

/// Member API data type
///
/// Public API representation of a member (for management responses)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberData {
    pub uid: String,
    pub email: String,
    pub level: i32,
    pub role: String,
    pub group: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MemberModel> for MemberData {
    fn from(member: MemberModel) -> Self {
        Self {
            uid: member.uid,
            email: member.email,
            level: member.level,
            role: member.role,
            group: member.group,
            state: member.state,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}
