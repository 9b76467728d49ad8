//! Ledger View is the page layer of a personal finance tracker.
//!
//! This library provides a request client for the tracker's HTTP API and a
//! view that renders the transactions of one account as HTML, handling the
//! delete actions a user can take on that page.

#![warn(missing_docs)]

mod account;
mod api;
mod config;
mod database_id;
mod html;
mod logging;
mod request;
mod timezone;
mod transaction;
mod transactions_page;

#[cfg(test)]
mod test_utils;

pub use account::Account;
pub use api::{
    AccountApi, ActiveAccount, ApiResponse, AppRefresh, Collaborators, ConfirmDialog,
    HttpAccountApi, HttpTransactionApi, TransactionApi,
};
pub use config::ClientConfig;
pub use database_id::{AccountId, TransactionId};
pub use html::page;
pub use logging::LOG_BODY_LENGTH_LIMIT;
pub use request::{FormData, Method, RequestClient, RequestOptions, ResponseBody, ResponseType};
pub use timezone::get_local_offset;
pub use transaction::{
    TransactionItem, TransactionKind, format_date, transaction_html, transactions_html,
};
pub use transactions_page::{
    ACCOUNT_TITLE_PLACEHOLDER, PageAction, PageRoot, Removal, RenderOptions, TransactionsView,
};

/// The errors that may occur while talking to the API or updating the page.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Error {
    /// The view was constructed without a root element to bind to.
    #[error("the root element does not exist")]
    MissingRootElement,

    /// The request could not be built, e.g. the URL is malformed or relative
    /// with no base URL to resolve it against.
    ///
    /// This is the error a caller gets back before any network I/O happens.
    #[error("could not build the request: {0}")]
    InvalidRequest(String),

    /// The request was sent but the transport failed before a response
    /// arrived (connection refused, reset, DNS failure and so on).
    #[error("the request failed: {0}")]
    Transport(String),

    /// The server responded with a status other than 200 OK.
    #[error("the server responded with status {0}")]
    UnexpectedStatus(u16),

    /// The response body could not be read or decoded into the expected
    /// shape.
    #[error("could not decode the response: {0}")]
    InvalidResponse(String),

    /// The API answered with `success: false`.
    ///
    /// The string is the error message reported by the API, if any.
    #[error("the request was rejected: {0}")]
    Rejected(String),

    /// No account in the sidebar carries the active marker.
    #[error("no account is marked as active")]
    NoActiveAccount,

    /// A timestamp could not be parsed for display.
    #[error("could not parse the date \"{0}\"")]
    InvalidDate(String),

    /// The lock guarding the page state was poisoned by a panicking thread.
    #[error("could not acquire the page lock")]
    PageLockError,

    /// The canonical timezone name is not known to the timezone database.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),
}
