//! The client used to make requests to the tracker's API.
//!
//! A request carries a flat set of form fields. For `GET` requests the fields
//! are appended to the URL as a query string, for every other method they are
//! sent as a `multipart/form-data` body.

use std::fmt;

use reqwest::{StatusCode, Url, header::CONTENT_TYPE, multipart::Form};
use serde::de::DeserializeOwned;

use crate::{
    Error,
    logging::{log_request, log_response},
};

/// The HTTP methods the API understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Read a resource, fields go in the query string.
    Get,
    /// Create a resource.
    Post,
    /// Replace a resource.
    Put,
    /// Delete a resource.
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// An ordered list of form fields.
///
/// Fields keep the order they were appended in, and a key may appear more than
/// once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData(Vec<(String, String)>);

impl FormData {
    /// An empty set of fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the end of the list.
    pub fn append(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.push((key.into(), value.to_string()));
    }

    /// Add a field and return the form, for building forms inline.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.append(key, value);
        self
    }

    /// Iterate over the fields as `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Whether the form has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append every field from `other`.
    pub fn extend(&mut self, other: FormData) {
        self.0.extend(other.0);
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for FormData
where
    K: Into<String>,
    V: ToString,
{
    fn from(fields: [(K, V); N]) -> Self {
        fields.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.to_string()))
                .collect(),
        )
    }
}

/// How the response body should be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseType {
    /// Read the body as UTF-8 text.
    #[default]
    Text,
    /// Parse the body as JSON.
    Json,
    /// Keep the raw bytes.
    Bytes,
}

/// A response body, read according to the requested [ResponseType].
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The body of a [ResponseType::Text] request.
    Text(String),
    /// The body of a [ResponseType::Json] request.
    Json(serde_json::Value),
    /// The body of a [ResponseType::Bytes] request.
    Bytes(Vec<u8>),
}

impl ResponseBody {
    /// Deserialize the body into `T`.
    ///
    /// Text and byte bodies are parsed as JSON first.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidResponse] if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, Error> {
        let result = match self {
            ResponseBody::Json(value) => serde_json::from_value(value),
            ResponseBody::Text(text) => serde_json::from_str(&text),
            ResponseBody::Bytes(bytes) => serde_json::from_slice(&bytes),
        };

        result.map_err(|error| Error::InvalidResponse(error.to_string()))
    }
}

/// Everything needed to make one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// The HTTP method.
    pub method: Method,
    /// An absolute URL, or a path relative to the client's base URL.
    pub url: String,
    /// The fields sent with the request.
    pub data: FormData,
    /// How to read the response body.
    pub response_type: ResponseType,
}

impl RequestOptions {
    /// Options for a request with no fields and a text response.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            data: FormData::new(),
            response_type: ResponseType::default(),
        }
    }

    /// Options for a `GET` request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Options for a `POST` request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    /// Options for a `PUT` request.
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    /// Options for a `DELETE` request.
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    /// Replace the fields sent with the request.
    pub fn data(mut self, data: FormData) -> Self {
        self.data = data;
        self
    }

    /// Set how the response body is read.
    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }
}

/// Append `data` to `url` as a query string.
///
/// Every field is written as `key=value&`, so a non-empty query always ends
/// with a trailing `&`. A `?` is added even when there are no fields. If `url`
/// already has a query string the fields are appended to it.
///
/// # Errors
///
/// Returns [Error::InvalidRequest] if a field cannot be URL encoded.
pub fn build_query_url(url: &str, data: &FormData) -> Result<String, Error> {
    let mut query_url = String::from(url);

    if !url.contains('?') {
        query_url.push('?');
    } else if !url.ends_with('?') && !url.ends_with('&') {
        query_url.push('&');
    }

    for field in data.iter() {
        let pair = serde_urlencoded::to_string([field])
            .map_err(|error| Error::InvalidRequest(error.to_string()))?;
        query_url.push_str(&pair);
        query_url.push('&');
    }

    Ok(query_url)
}

/// Sends requests to the API, one at a time per call.
///
/// Cookies set by the server are stored and sent with later requests, so a
/// session established by logging in carries over to every other request made
/// through the same client. Clones share the cookie store.
///
/// There is no retry, timeout or cancellation: a request either completes or
/// fails once.
#[derive(Debug, Clone)]
pub struct RequestClient {
    http_client: reqwest::Client,
    base_url: Option<Url>,
}

impl RequestClient {
    /// Create a client that only accepts absolute URLs.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidRequest] if the HTTP client cannot be
    /// initialised, e.g. the TLS backend is unavailable.
    pub fn new() -> Result<Self, Error> {
        let http_client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|error| Error::InvalidRequest(error.to_string()))?;

        Ok(Self {
            http_client,
            base_url: None,
        })
    }

    /// Create a client that resolves relative URLs against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidRequest] if `base_url` is not an absolute URL or
    /// the HTTP client cannot be initialised.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)
            .map_err(|error| Error::InvalidRequest(format!("{base_url}: {error}")))?;

        Ok(Self {
            base_url: Some(base_url),
            ..Self::new()?
        })
    }

    fn resolve_url(&self, url: &str) -> Result<Url, Error> {
        let resolved = match (&self.base_url, Url::parse(url)) {
            (_, Ok(absolute)) => Ok(absolute),
            (Some(base_url), Err(_)) => base_url.join(url),
            (None, Err(error)) => Err(error),
        };

        resolved.map_err(|error| Error::InvalidRequest(format!("{url}: {error}")))
    }

    /// Build the request described by `options` without sending it.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidRequest] if the URL cannot be resolved or the
    /// fields cannot be encoded.
    pub fn build_request(&self, options: &RequestOptions) -> Result<reqwest::Request, Error> {
        let builder = match options.method {
            Method::Get => {
                let url = build_query_url(&options.url, &options.data)?;
                self.http_client.get(self.resolve_url(&url)?)
            }
            method => {
                let builder = self
                    .http_client
                    .request(method.as_reqwest(), self.resolve_url(&options.url)?);

                if options.data.is_empty() {
                    // reqwest sends no body at all for a form without parts,
                    // which is not a valid multipart message.
                    let boundary = Form::new().boundary().to_owned();
                    builder
                        .header(
                            CONTENT_TYPE,
                            format!("multipart/form-data; boundary={boundary}"),
                        )
                        .body(format!("--{boundary}--\r\n"))
                } else {
                    let form = options
                        .data
                        .iter()
                        .fold(Form::new(), |form, (key, value)| {
                            form.text(key.to_owned(), value.to_owned())
                        });

                    builder.multipart(form)
                }
            }
        };

        builder
            .build()
            .map_err(|error| Error::InvalidRequest(error.to_string()))
    }

    /// Send one request and read the response body.
    ///
    /// # Errors
    ///
    /// - [Error::InvalidRequest] if the request could not be built.
    /// - [Error::Transport] if the request could not be completed.
    /// - [Error::UnexpectedStatus] if the status is anything but 200 OK.
    /// - [Error::InvalidResponse] if the body could not be read as the
    ///   requested [ResponseType].
    pub async fn send(&self, options: RequestOptions) -> Result<ResponseBody, Error> {
        let request = self.build_request(&options)?;
        log_request(options.method, request.url(), &options.data);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| {
                tracing::error!("{} {} failed: {error}", options.method, options.url);
                Error::Transport(error.to_string())
            })?;

        let status = response.status();

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            log_response(status.as_u16(), &body);
            tracing::warn!(
                "{} {} responded with {status}",
                options.method,
                options.url
            );
            return Err(Error::UnexpectedStatus(status.as_u16()));
        }

        let body = match options.response_type {
            ResponseType::Text => response.text().await.map(ResponseBody::Text),
            ResponseType::Bytes => response
                .bytes()
                .await
                .map(|bytes| ResponseBody::Bytes(bytes.to_vec())),
            ResponseType::Json => response.json().await.map(ResponseBody::Json),
        }
        .map_err(|error| Error::InvalidResponse(error.to_string()))?;

        match &body {
            ResponseBody::Text(text) => log_response(status.as_u16(), text),
            ResponseBody::Json(value) => log_response(status.as_u16(), &value.to_string()),
            ResponseBody::Bytes(bytes) => {
                log_response(status.as_u16(), &format!("<{} bytes>", bytes.len()))
            }
        }

        Ok(body)
    }
}
