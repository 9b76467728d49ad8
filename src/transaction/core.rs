use std::fmt;

use serde::Deserialize;

use crate::database_id::TransactionId;

/// Whether a transaction adds money to or takes money from an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming into the account.
    #[serde(alias = "INCOME")]
    Income,
    /// Money going out of the account.
    #[serde(alias = "EXPENSE")]
    Expense,
}

impl TransactionKind {
    /// The lowercase tag used by the API and in CSS class names.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction as listed by the API.
///
/// The page never modifies transactions, it only displays and deletes them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionItem {
    /// The ID used to delete the transaction.
    pub id: TransactionId,
    /// What the transaction was for.
    pub name: String,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The amount of money.
    pub sum: f64,
    /// When the transaction was recorded, e.g. "2019-03-10 03:20:41".
    pub created_at: String,
}
