//! Account domain - per-member balances keyed by (member, currency, code)

pub mod models;

pub use models::account::{Account, AccountKey};
