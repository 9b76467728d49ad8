//! Test doubles for the collaborators of the transactions page.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    Error,
    account::Account,
    api::{AccountApi, ActiveAccount, AppRefresh, Collaborators, ConfirmDialog, TransactionApi},
    database_id::{AccountId, TransactionId},
    request::FormData,
    transaction::{TransactionItem, TransactionKind},
    transactions_page::RenderOptions,
};

pub(crate) fn transaction_item(id: &str, name: &str) -> TransactionItem {
    TransactionItem {
        id: TransactionId::from(id),
        name: name.to_owned(),
        kind: TransactionKind::Income,
        sum: 100.0,
        created_at: "2019-03-10 03:20:41".to_owned(),
    }
}

#[derive(Default)]
struct Script {
    account: Option<Result<Account, Error>>,
    transactions: Option<Result<Vec<TransactionItem>, Error>>,
    account_removal: Option<Result<(), Error>>,
    transaction_removal: Option<Result<(), Error>>,
    confirmation: bool,
    active_account: Option<AccountId>,
}

#[derive(Default)]
struct Calls {
    account_gets: Vec<AccountId>,
    transaction_lists: Vec<RenderOptions>,
    account_removals: Vec<(AccountId, FormData)>,
    transaction_removals: Vec<TransactionId>,
    prompts: Vec<String>,
    refresh_count: usize,
}

#[derive(Default)]
struct Doubles {
    script: Mutex<Script>,
    calls: Mutex<Calls>,
}

/// Scripted stand-ins for every collaborator that record how they were called.
///
/// Unscripted reads fail with a 404, unscripted deletes succeed and the
/// confirmation dialog answers "no".
#[derive(Clone, Default)]
pub(crate) struct TestCollaborators(Arc<Doubles>);

impl TestCollaborators {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn script(self, edit: impl FnOnce(&mut Script)) -> Self {
        edit(&mut *self.0.script.lock().unwrap());
        self
    }

    pub(crate) fn with_account(self, account: Result<Account, Error>) -> Self {
        self.script(|script| script.account = Some(account))
    }

    pub(crate) fn with_transactions(self, items: Result<Vec<TransactionItem>, Error>) -> Self {
        self.script(|script| script.transactions = Some(items))
    }

    pub(crate) fn with_account_removal(self, result: Result<(), Error>) -> Self {
        self.script(|script| script.account_removal = Some(result))
    }

    pub(crate) fn with_transaction_removal(self, result: Result<(), Error>) -> Self {
        self.script(|script| script.transaction_removal = Some(result))
    }

    pub(crate) fn with_confirmation(self, answer: bool) -> Self {
        self.script(|script| script.confirmation = answer)
    }

    pub(crate) fn with_active_account(self, id: Option<AccountId>) -> Self {
        self.script(|script| script.active_account = id)
    }

    pub(crate) fn bundle(&self) -> Collaborators {
        Collaborators {
            accounts: self.0.clone(),
            transactions: self.0.clone(),
            app: self.0.clone(),
            dialog: self.0.clone(),
            active_account: self.0.clone(),
        }
    }

    pub(crate) fn account_gets(&self) -> Vec<AccountId> {
        self.0.calls.lock().unwrap().account_gets.clone()
    }

    pub(crate) fn transaction_lists(&self) -> Vec<RenderOptions> {
        self.0.calls.lock().unwrap().transaction_lists.clone()
    }

    pub(crate) fn account_removals(&self) -> Vec<(AccountId, FormData)> {
        self.0.calls.lock().unwrap().account_removals.clone()
    }

    pub(crate) fn transaction_removals(&self) -> Vec<TransactionId> {
        self.0.calls.lock().unwrap().transaction_removals.clone()
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.0.calls.lock().unwrap().prompts.clone()
    }

    pub(crate) fn refresh_count(&self) -> usize {
        self.0.calls.lock().unwrap().refresh_count
    }
}

#[async_trait]
impl AccountApi for Doubles {
    async fn get(&self, id: &AccountId, _data: FormData) -> Result<Account, Error> {
        self.calls.lock().unwrap().account_gets.push(id.clone());
        self.script
            .lock()
            .unwrap()
            .account
            .clone()
            .unwrap_or(Err(Error::UnexpectedStatus(404)))
    }

    async fn remove(&self, id: &AccountId, data: FormData) -> Result<(), Error> {
        self.calls
            .lock()
            .unwrap()
            .account_removals
            .push((id.clone(), data));
        self.script
            .lock()
            .unwrap()
            .account_removal
            .clone()
            .unwrap_or(Ok(()))
    }
}

#[async_trait]
impl TransactionApi for Doubles {
    async fn list(&self, options: &RenderOptions) -> Result<Vec<TransactionItem>, Error> {
        self.calls
            .lock()
            .unwrap()
            .transaction_lists
            .push(options.clone());
        self.script
            .lock()
            .unwrap()
            .transactions
            .clone()
            .unwrap_or(Err(Error::UnexpectedStatus(404)))
    }

    async fn remove(&self, id: &TransactionId, _data: FormData) -> Result<(), Error> {
        self.calls
            .lock()
            .unwrap()
            .transaction_removals
            .push(id.clone());
        self.script
            .lock()
            .unwrap()
            .transaction_removal
            .clone()
            .unwrap_or(Ok(()))
    }
}

impl AppRefresh for Doubles {
    fn update(&self) {
        self.calls.lock().unwrap().refresh_count += 1;
    }
}

impl ConfirmDialog for Doubles {
    fn confirm(&self, message: &str) -> bool {
        self.calls.lock().unwrap().prompts.push(message.to_owned());
        self.script.lock().unwrap().confirmation
    }
}

impl ActiveAccount for Doubles {
    fn active_account_id(&self) -> Option<AccountId> {
        self.script.lock().unwrap().active_account.clone()
    }
}
