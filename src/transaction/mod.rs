//! Income and expense transactions.
//!
//! This module contains:
//! - The `TransactionItem` model as returned by the API
//! - Date formatting for display
//! - The HTML fragments for a list of transactions

mod core;
mod date;
mod view;

pub use core::{TransactionItem, TransactionKind};
pub use date::format_date;
pub use view::{transaction_html, transactions_html};
