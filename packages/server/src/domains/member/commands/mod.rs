//! Member commands - payload parsing and field validation
//!
//! Parsing reports the first shape error (`level is invalid`); validation
//! collects every failed field of the record into one message.

use crate::common::validation::{is_valid_email, GROUP_MAX_LENGTH};
use crate::common::{CommandError, PayloadReader, ValidationErrors, ValidationRules};
use crate::domains::member::models::NewMember;

/// Create-or-update payload: `{uid, email, level, role, group?, state?}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertMemberCommand(pub NewMember);

/// Group change payload: `{uid, group}`
///
/// A numeric group is coerced to its string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetGroupCommand {
    pub uid: String,
    pub group: String,
}

impl UpsertMemberCommand {
    pub fn parse(data: &serde_json::Value) -> Result<Self, CommandError> {
        let reader = PayloadReader::new(data)?;
        Ok(Self(NewMember {
            uid: reader.identifier("uid")?,
            email: reader.string("email")?,
            level: reader.integer("level")?,
            role: reader.string("role")?,
            group: reader.optional_string("group")?,
            state: reader.optional_string("state")?,
        }))
    }

    pub fn validate(&self, rules: &ValidationRules) -> Result<(), ValidationErrors> {
        let member = &self.0;
        let mut errors = ValidationErrors::new();

        if member.uid.trim().is_empty() {
            errors.add("uid", "can't be blank");
        }
        if !is_valid_email(&member.email) {
            errors.add("email", "is invalid");
        }
        if !rules.levels.contains(&member.level) {
            errors.add("level", "is not included in the list");
        }
        if !rules.roles.iter().any(|r| r == &member.role) {
            errors.add("role", "is not included in the list");
        }
        if let Some(group) = &member.group {
            check_group(group, &mut errors);
        }
        if let Some(state) = &member.state {
            if state.trim().is_empty() {
                errors.add("state", "can't be blank");
            }
        }

        errors.into_result()
    }
}

impl SetGroupCommand {
    /// Reads only the uid, leaving `group` untouched.
    pub fn target_uid(data: &serde_json::Value) -> Result<String, CommandError> {
        PayloadReader::new(data)?.identifier("uid")
    }

    pub fn parse(data: &serde_json::Value) -> Result<Self, CommandError> {
        let reader = PayloadReader::new(data)?;
        Ok(Self {
            uid: reader.identifier("uid")?,
            group: reader.identifier("group")?,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_group(&self.group, &mut errors);
        errors.into_result()
    }
}

fn check_group(group: &str, errors: &mut ValidationErrors) {
    if group.trim().is_empty() {
        errors.add("group", "can't be blank");
    } else if group.chars().count() > GROUP_MAX_LENGTH {
        errors.add(
            "group",
            format!("is too long (maximum is {} characters)", GROUP_MAX_LENGTH),
        );
    }
}
