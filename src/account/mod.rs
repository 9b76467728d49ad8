//! Accounts as they are returned by the API.

mod core;

pub use core::Account;
