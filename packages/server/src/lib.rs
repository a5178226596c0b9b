// Management API - Core
//
// Multisig-gated administrative commands: member upsert, member group
// changes and transfers with destination account auto-provisioning.
//
// Request flow: routes → MultisigGuard → domain commands/actions → BaseStore

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
