pub mod transfer;

pub use transfer::{AccountRef, Operation, Transfer};
