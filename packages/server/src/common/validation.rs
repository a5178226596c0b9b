//! Field-level validation results and the registered value lists they check
//! against.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Address grammar of the HTML living standard / URI::MailTo
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Maximum length of a member group name, in characters.
pub const GROUP_MAX_LENGTH: usize = 32;

/// Group assigned to members created without one.
pub const DEFAULT_GROUP: &str = "vip-0";

/// State assigned to members created without one.
pub const DEFAULT_STATE: &str = "active";

/// Registered identifiers that member and transfer payloads are checked
/// against. Loaded from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    pub levels: Vec<i32>,
    pub roles: Vec<String>,
    pub transfer_categories: Vec<String>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            levels: vec![0, 1, 2, 3, 4, 5],
            roles: [
                "admin",
                "superadmin",
                "accountant",
                "compliance",
                "technical",
                "reporter",
                "support",
                "trader",
                "broker",
                "maker",
                "member",
            ]
            .iter()
            .map(|r| r.to_string())
            .collect(),
            transfer_categories: ["wire", "refund", "purchases", "commission"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

/// One failed field check, e.g. `email` / `is invalid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", humanize(&self.field), self.message)
    }
}

/// Accumulated field errors for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_error_on(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// `Validation failed: Email is invalid, Role is not included in the list`
    pub fn full_message(&self) -> String {
        let details = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("Validation failed: {}", details)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_message())
    }
}

/// `account_src` -> `Account src`
fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
