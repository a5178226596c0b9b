//! Transfer domain - multi-leg balance movements with destination
//! auto-provisioning
//!
//! Architecture:
//!   route → MultisigGuard (quorum) → commands (parse + validate)
//!         → TransferPlan → BaseStore::execute_transfer (Ledger, one transaction)

pub mod actions;
pub mod commands;
pub mod data;
pub mod ledger;
pub mod models;
pub mod plan;

pub use data::TransferData;
pub use ledger::{Ledger, LedgerEntry, TransferRejection};
pub use models::{AccountRef, Operation, Transfer};
pub use plan::TransferPlan;
