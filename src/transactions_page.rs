//! The page that shows the income and expenses of one account.
//!
//! [TransactionsView] owns the page region it was bound to: the account title
//! and the list of transactions. It fills them in from the API and handles the
//! two delete buttons on the page.

use std::sync::{Mutex, MutexGuard};

use maud::{Markup, PreEscaped, html};
use time::UtcOffset;

use crate::{
    Error,
    api::Collaborators,
    database_id::{AccountId, TransactionId},
    request::FormData,
    transaction::{TransactionItem, format_date, transactions_html},
};

/// The title shown while no account is displayed.
pub const ACCOUNT_TITLE_PLACEHOLDER: &str = "Название счёта";

const REMOVE_ACCOUNT_PROMPT: &str = "Вы действительно хотите удалить счёт?";
const REMOVE_TRANSACTION_PROMPT: &str = "Вы действительно хотите удалить эту транзакцию?";

/// Selects which account's transactions are displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// The account to display.
    pub account_id: AccountId,
    /// Extra filters passed through to the transaction listing.
    pub filters: FormData,
}

impl RenderOptions {
    /// Display every transaction of `account_id`.
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            filters: FormData::new(),
        }
    }

    /// The query fields for listing transactions, `account_id` first.
    pub fn to_form_data(&self) -> FormData {
        let mut data = FormData::from([("account_id", self.account_id.as_str())]);
        data.extend(self.filters.clone());
        data
    }
}

/// The region of the page a [TransactionsView] is bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRoot {
    title: String,
    content: String,
}

impl Default for PageRoot {
    fn default() -> Self {
        Self {
            title: ACCOUNT_TITLE_PLACEHOLDER.to_owned(),
            content: String::new(),
        }
    }
}

impl PageRoot {
    /// The text of the `.content-title` element.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The HTML inside the `.content` element.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Render the region: the title, the delete account button and the
    /// transaction list.
    pub fn html(&self) -> Markup {
        html! {
            section class="content-wrapper"
            {
                header class="content-header"
                {
                    h1 class="content-title" { (self.title) }
                    button class="btn btn-danger remove-account"
                    {
                        span class="fa fa-trash" {}
                        " Удалить счёт"
                    }
                }
                section class="content" { (PreEscaped(&self.content)) }
            }
        }
    }
}

/// A click that the page responds to.
#[derive(Debug, Clone, PartialEq)]
pub enum PageAction {
    /// The delete account button was clicked.
    RemoveAccount,
    /// A transaction's delete button was clicked.
    RemoveTransaction(TransactionId),
}

impl PageAction {
    /// Work out the action for a click on an element with the class attribute
    /// `class_attr` and the `data-id` attribute `data_id`.
    ///
    /// Returns `None` for elements the page does not handle, including a
    /// transaction delete button without an ID.
    pub fn from_click(class_attr: &str, data_id: Option<&str>) -> Option<Self> {
        let mut classes = class_attr.split_whitespace();

        if classes.clone().any(|class| class == "remove-account") {
            return Some(PageAction::RemoveAccount);
        }

        match (classes.any(|class| class == "transaction__remove"), data_id) {
            (true, Some(id)) => Some(PageAction::RemoveTransaction(TransactionId::from(id))),
            _ => None,
        }
    }
}

/// What came of a delete action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Nothing was displayed so there was nothing to delete.
    Skipped,
    /// The user declined the confirmation prompt.
    Cancelled,
    /// The API deleted the record.
    Removed,
}

/// Displays the transactions of one account.
///
/// The view is either bound to an account, after [TransactionsView::render],
/// or cleared. Rendering fetches the account and its transactions
/// concurrently and each fetch fills in its own part of the page as soon as
/// it completes. Responses to an earlier render that arrive late are not
/// discarded.
pub struct TransactionsView {
    root: Mutex<PageRoot>,
    last_options: Mutex<Option<RenderOptions>>,
    collaborators: Collaborators,
    local_offset: UtcOffset,
}

impl TransactionsView {
    /// Bind a view to `root`.
    ///
    /// Dates are displayed in UTC until [TransactionsView::with_local_offset]
    /// says otherwise.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingRootElement] if `root` is `None`.
    pub fn new(root: Option<PageRoot>, collaborators: Collaborators) -> Result<Self, Error> {
        let root = root.ok_or(Error::MissingRootElement)?;

        Ok(Self {
            root: Mutex::new(root),
            last_options: Mutex::new(None),
            collaborators,
            local_offset: UtcOffset::UTC,
        })
    }

    /// Display dates at `local_offset`.
    pub fn with_local_offset(mut self, local_offset: UtcOffset) -> Self {
        self.local_offset = local_offset;
        self
    }

    fn lock_root(&self) -> Result<MutexGuard<'_, PageRoot>, Error> {
        self.root.lock().map_err(|error| {
            tracing::error!("could not acquire page lock: {error}");
            Error::PageLockError
        })
    }

    fn lock_last_options(
        &self,
    ) -> Result<MutexGuard<'_, Option<RenderOptions>>, Error> {
        self.last_options.lock().map_err(|error| {
            tracing::error!("could not acquire page lock: {error}");
            Error::PageLockError
        })
    }

    /// The options of the last render, or `None` if the view is cleared.
    pub fn last_options(&self) -> Result<Option<RenderOptions>, Error> {
        Ok(self.lock_last_options()?.clone())
    }

    /// A copy of the bound page region.
    pub fn root(&self) -> Result<PageRoot, Error> {
        Ok(self.lock_root()?.clone())
    }

    /// Respond to a click on the page.
    ///
    /// # Errors
    ///
    /// Returns the error of the delete action, see
    /// [TransactionsView::remove_account] and
    /// [TransactionsView::remove_transaction].
    pub async fn handle(&self, action: PageAction) -> Result<Removal, Error> {
        match action {
            PageAction::RemoveAccount => self.remove_account().await,
            PageAction::RemoveTransaction(id) => self.remove_transaction(&id).await,
        }
    }

    /// Render the page again with the options of the last render.
    ///
    /// Does nothing if the view is cleared.
    ///
    /// # Errors
    ///
    /// See [TransactionsView::render].
    pub async fn update(&self) -> Result<(), Error> {
        let options = self.last_options()?;
        self.render(options).await
    }

    /// Delete the displayed account after the user confirms.
    ///
    /// The account to delete is the one the sidebar marks as active. The page
    /// is cleared before the delete request is sent, and the app is refreshed
    /// once the request finishes whether it succeeded or not.
    ///
    /// Returns [Removal::Skipped] without prompting if no account is
    /// displayed.
    ///
    /// # Errors
    ///
    /// - [Error::NoActiveAccount] if no account is marked as active. The page
    ///   is left as it was.
    /// - Any error from the account collaborator.
    pub async fn remove_account(&self) -> Result<Removal, Error> {
        if self.last_options()?.is_none() {
            return Ok(Removal::Skipped);
        }

        if !self.collaborators.dialog.confirm(REMOVE_ACCOUNT_PROMPT) {
            return Ok(Removal::Cancelled);
        }

        let account_id = self
            .collaborators
            .active_account
            .active_account_id()
            .ok_or(Error::NoActiveAccount)?;

        self.clear()?;

        let result = self
            .collaborators
            .accounts
            .remove(&account_id, FormData::from([("_method", "DELETE")]))
            .await;

        self.collaborators.app.update();

        match result {
            Ok(()) => Ok(Removal::Removed),
            Err(error) => {
                tracing::error!("Could not delete account {account_id}: {error}");
                Err(error)
            }
        }
    }

    /// Delete a transaction after the user confirms.
    ///
    /// The app is refreshed only if the API reports that the transaction was
    /// deleted.
    ///
    /// # Errors
    ///
    /// Any error from the transaction collaborator, including
    /// [Error::Rejected].
    pub async fn remove_transaction(&self, id: &TransactionId) -> Result<Removal, Error> {
        if !self.collaborators.dialog.confirm(REMOVE_TRANSACTION_PROMPT) {
            return Ok(Removal::Cancelled);
        }

        match self
            .collaborators
            .transactions
            .remove(id, FormData::new())
            .await
        {
            Ok(()) => {
                self.collaborators.app.update();
                Ok(Removal::Removed)
            }
            Err(error) => {
                tracing::error!("Could not delete transaction {id}: {error}");
                Err(error)
            }
        }
    }

    /// Display the account and transactions selected by `options`.
    ///
    /// Does nothing if `options` is `None`. The title and the transaction list
    /// are fetched concurrently and each is updated on its own, so if one
    /// fetch fails the other part of the page is still updated.
    ///
    /// # Errors
    ///
    /// Returns the first error once both fetches have finished.
    pub async fn render(&self, options: Option<RenderOptions>) -> Result<(), Error> {
        let Some(options) = options else {
            return Ok(());
        };

        *self.lock_last_options()? = Some(options.clone());

        let (title, transactions) = tokio::join!(
            self.fetch_title(&options.account_id),
            self.fetch_transactions(&options)
        );

        title.and(transactions)
    }

    async fn fetch_title(&self, account_id: &AccountId) -> Result<(), Error> {
        let account = self
            .collaborators
            .accounts
            .get(account_id, FormData::new())
            .await
            .inspect_err(|error| {
                tracing::error!("Could not get account {account_id}: {error}");
            })?;

        self.render_title(&account.name)
    }

    async fn fetch_transactions(&self, options: &RenderOptions) -> Result<(), Error> {
        let items = self
            .collaborators
            .transactions
            .list(options)
            .await
            .inspect_err(|error| {
                tracing::error!(
                    "Could not list transactions for account {}: {error}",
                    options.account_id
                );
            })?;

        self.render_transactions(&items)
    }

    /// Empty the transaction list, reset the title to
    /// [ACCOUNT_TITLE_PLACEHOLDER] and unbind the view.
    ///
    /// # Errors
    ///
    /// Returns [Error::PageLockError] if the page lock is poisoned.
    pub fn clear(&self) -> Result<(), Error> {
        self.render_transactions(&[])?;
        self.render_title(ACCOUNT_TITLE_PLACEHOLDER)?;
        *self.lock_last_options()? = None;

        Ok(())
    }

    /// Set the page title. `name` is displayed as text, never as markup.
    ///
    /// # Errors
    ///
    /// Returns [Error::PageLockError] if the page lock is poisoned.
    pub fn render_title(&self, name: &str) -> Result<(), Error> {
        self.lock_root()?.title = name.to_owned();
        Ok(())
    }

    /// Replace the transaction list with `items`.
    ///
    /// # Errors
    ///
    /// Returns [Error::PageLockError] if the page lock is poisoned.
    pub fn render_transactions(&self, items: &[TransactionItem]) -> Result<(), Error> {
        let content = transactions_html(items, self.local_offset).into_string();
        self.lock_root()?.content = content;
        Ok(())
    }

    /// Format a timestamp in the view's local offset, see [format_date].
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidDate] if `date` cannot be parsed.
    pub fn format_date(&self, date: &str) -> Result<String, Error> {
        format_date(date, self.local_offset)
    }
}
