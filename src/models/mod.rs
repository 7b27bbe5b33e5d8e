pub mod account;
pub mod receipt;
pub mod ride;
