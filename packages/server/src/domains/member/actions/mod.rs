//! Member domain actions - business logic functions
//!
//! Actions receive a command that already passed multisig quorum, validate
//! it and perform the single atomic store mutation.

mod set_group;
mod upsert_member;

pub use set_group::set_member_group;
pub use upsert_member::upsert_member;
