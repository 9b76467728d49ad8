//! Account and transaction collaborators backed by the HTTP API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::{
    Error,
    account::Account,
    database_id::{AccountId, TransactionId},
    request::{FormData, RequestClient, RequestOptions, ResponseType},
    transaction::TransactionItem,
    transactions_page::RenderOptions,
};

use super::{AccountApi, ApiResponse, TransactionApi};

/// A REST resource under the API base URL, e.g. `account`.
#[derive(Debug, Clone)]
struct Entity {
    client: RequestClient,
    path: &'static str,
}

/// `<path>/<id>` with `id` percent-encoded as a single path segment.
///
/// # Errors
///
/// Returns [Error::InvalidRequest] for an empty ID and for `.` and `..`, which
/// URL resolution would treat as a reference to another path.
fn item_path(path: &str, id: &str) -> Result<String, Error> {
    if matches!(id, "" | "." | "..") {
        return Err(Error::InvalidRequest(format!("invalid ID {id:?}")));
    }

    Ok(format!("{path}/{}", urlencoding::encode(id)))
}

impl Entity {
    /// `GET <path>/<id>` with `data` in the query string.
    async fn get<T: DeserializeOwned>(&self, id: &str, data: FormData) -> Result<T, Error> {
        let options = RequestOptions::get(item_path(self.path, id)?)
            .data(data)
            .response_type(ResponseType::Json);

        self.client
            .send(options)
            .await?
            .json::<ApiResponse<T>>()?
            .into_data()
    }

    /// `GET <path>` with `data` in the query string.
    async fn list<T: DeserializeOwned>(&self, data: FormData) -> Result<T, Error> {
        let options = RequestOptions::get(self.path)
            .data(data)
            .response_type(ResponseType::Json);

        self.client
            .send(options)
            .await?
            .json::<ApiResponse<T>>()?
            .into_data()
    }

    /// `DELETE <path>` with `id` and `data` in the form body.
    async fn remove(&self, id: &str, data: FormData) -> Result<(), Error> {
        let mut form = FormData::from([("id", id)]);
        form.extend(data);

        let options = RequestOptions::delete(self.path)
            .data(form)
            .response_type(ResponseType::Json);

        self.client
            .send(options)
            .await?
            .json::<ApiResponse<serde_json::Value>>()?
            .into_success()
    }
}

/// Accounts served from `<api url>/account`.
#[derive(Debug, Clone)]
pub struct HttpAccountApi {
    entity: Entity,
}

impl HttpAccountApi {
    /// Make account requests through `client`, which should have the API URL
    /// as its base URL.
    pub fn new(client: RequestClient) -> Self {
        Self {
            entity: Entity {
                client,
                path: "account",
            },
        }
    }
}

#[async_trait]
impl AccountApi for HttpAccountApi {
    async fn get(&self, id: &AccountId, data: FormData) -> Result<Account, Error> {
        self.entity.get(id.as_str(), data).await
    }

    async fn remove(&self, id: &AccountId, data: FormData) -> Result<(), Error> {
        self.entity.remove(id.as_str(), data).await
    }
}

/// Transactions served from `<api url>/transaction`.
#[derive(Debug, Clone)]
pub struct HttpTransactionApi {
    entity: Entity,
}

impl HttpTransactionApi {
    /// Make transaction requests through `client`, which should have the API
    /// URL as its base URL.
    pub fn new(client: RequestClient) -> Self {
        Self {
            entity: Entity {
                client,
                path: "transaction",
            },
        }
    }
}

#[async_trait]
impl TransactionApi for HttpTransactionApi {
    async fn list(&self, options: &RenderOptions) -> Result<Vec<TransactionItem>, Error> {
        self.entity.list(options.to_form_data()).await
    }

    async fn remove(&self, id: &TransactionId, data: FormData) -> Result<(), Error> {
        self.entity.remove(id.as_str(), data).await
    }
}
