pub mod account;
pub mod member;
pub mod transfer;
