//! The collaborators the transactions page depends on.
//!
//! The page never talks to the network, the sidebar or the rest of the app
//! directly. Instead it is handed a [Collaborators] bundle so that each piece
//! can be swapped out, e.g. for test doubles.

mod entity;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    Error,
    account::Account,
    database_id::{AccountId, TransactionId},
    request::FormData,
    transaction::TransactionItem,
    transactions_page::RenderOptions,
};

pub use entity::{HttpAccountApi, HttpTransactionApi};

/// The envelope every API response is wrapped in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the API carried out the request.
    pub success: bool,
    /// The payload, present on success for requests that return data.
    pub data: Option<T>,
    /// Why the request was not carried out.
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Check that the request succeeded, discarding any payload.
    ///
    /// # Errors
    ///
    /// Returns [Error::Rejected] if `success` is false.
    pub fn into_success(self) -> Result<(), Error> {
        if self.success {
            Ok(())
        } else {
            Err(Error::Rejected(self.error.unwrap_or_default()))
        }
    }

    /// The payload of a successful request.
    ///
    /// # Errors
    ///
    /// - [Error::Rejected] if `success` is false.
    /// - [Error::InvalidResponse] if the request succeeded without a payload.
    pub fn into_data(self) -> Result<T, Error> {
        if !self.success {
            return Err(Error::Rejected(self.error.unwrap_or_default()));
        }

        self.data
            .ok_or_else(|| Error::InvalidResponse("the response has no data".to_owned()))
    }
}

/// Reads and deletes accounts.
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Get the account with the ID `id`.
    async fn get(&self, id: &AccountId, data: FormData) -> Result<Account, Error>;

    /// Delete the account with the ID `id`.
    async fn remove(&self, id: &AccountId, data: FormData) -> Result<(), Error>;
}

/// Lists and deletes transactions.
#[async_trait]
pub trait TransactionApi: Send + Sync {
    /// List the transactions selected by `options`.
    async fn list(&self, options: &RenderOptions) -> Result<Vec<TransactionItem>, Error>;

    /// Delete the transaction with the ID `id`.
    async fn remove(&self, id: &TransactionId, data: FormData) -> Result<(), Error>;
}

/// Refreshes the whole application, e.g. the sidebar and the page.
pub trait AppRefresh: Send + Sync {
    /// Re-render everything from fresh data.
    fn update(&self);
}

/// A blocking yes/no prompt shown to the user.
pub trait ConfirmDialog: Send + Sync {
    /// Show `message` and return whether the user agreed.
    fn confirm(&self, message: &str) -> bool;
}

/// The sidebar's record of which account is currently selected.
pub trait ActiveAccount: Send + Sync {
    /// The ID of the account marked as active, if any.
    fn active_account_id(&self) -> Option<AccountId>;
}

/// Everything the transactions page calls out to.
#[derive(Clone)]
pub struct Collaborators {
    /// Account reads and deletes.
    pub accounts: Arc<dyn AccountApi>,
    /// Transaction listing and deletes.
    pub transactions: Arc<dyn TransactionApi>,
    /// The global refresh hook.
    pub app: Arc<dyn AppRefresh>,
    /// Confirmation prompts.
    pub dialog: Arc<dyn ConfirmDialog>,
    /// The active account marker.
    pub active_account: Arc<dyn ActiveAccount>,
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::ApiResponse;

    #[test]
    fn rejected_response_carries_error_message() {
        let response: ApiResponse<serde_json::Value> =
            serde_json::from_str(r#"{"success": false, "error": "Счёт не найден"}"#).unwrap();

        assert_eq!(
            response.into_data(),
            Err(Error::Rejected("Счёт не найден".to_owned()))
        );
    }

    #[test]
    fn successful_response_without_data_is_invalid() {
        let response: ApiResponse<Vec<u8>> = serde_json::from_str(r#"{"success": true}"#).unwrap();

        assert!(
            matches!(response.into_data(), Err(Error::InvalidResponse(_))),
            "want invalid response error"
        );
    }

    #[test]
    fn success_without_data_is_fine_when_data_is_not_needed() {
        let response: ApiResponse<serde_json::Value> =
            serde_json::from_str(r#"{"success": true}"#).unwrap();

        assert_eq!(response.into_success(), Ok(()));
    }
}
