//! Member domain - member records managed through signed management commands
//!
//! Architecture:
//!   route → MultisigGuard (quorum) → commands (parse + validate) → actions → BaseStore

pub mod actions;
pub mod commands;
pub mod data;
pub mod models;

// Re-export commonly used types
pub use data::MemberData;
pub use models::member::{Member, NewMember, UpsertOutcome, UpsertedMember};
