//! Transfer domain actions

mod create_transfer;

pub use create_transfer::create_transfer;
