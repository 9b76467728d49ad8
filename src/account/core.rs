use serde::Deserialize;

use crate::database_id::AccountId;

/// A bank account, wallet or card that transactions are recorded against.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Account {
    /// The ID of the account.
    pub id: AccountId,
    /// The display name of the account.
    pub name: String,
    /// The balance of the account, if the API reports one.
    #[serde(default)]
    pub sum: Option<f64>,
}
