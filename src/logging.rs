//! Logging for outgoing requests and their responses.

use reqwest::Url;

use crate::request::{FormData, Method};

/// The number of bytes of a response body logged at the `info` level.
///
/// Longer bodies are truncated at `info` and logged in full at `debug`.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED_FIELDS: [&str; 2] = ["password", "confirm_password"];

/// Log the method, URL and fields of a request at the `info` level.
///
/// Password fields are replaced with asterisks. The query string is left out
/// of the URL since it repeats the fields of a `GET` request unredacted.
pub(crate) fn log_request(method: Method, url: &Url, data: &FormData) {
    let fields = redact_passwords(data);
    let url = without_query(url);

    if fields.is_empty() {
        tracing::info!("Sending request: {method} {url}");
    } else {
        tracing::info!("Sending request: {method} {url}\nfields: {fields:?}");
    }
}

/// Log the status and body of a response at the `info` level.
pub(crate) fn log_response(status: u16, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received response: {status}\nbody: {:}...",
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Received response: {status}\nbody: {body:?}");
    }
}

fn redact_passwords(data: &FormData) -> Vec<(&str, &str)> {
    data.iter()
        .map(|(key, value)| {
            if REDACTED_FIELDS.iter().any(|field| *field == key) {
                (key, "********")
            } else {
                (key, value)
            }
        })
        .collect()
}

fn without_query(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_query(None);
    url
}

/// Cut `text` to at most `limit` bytes without splitting a character.
fn truncate(text: &str, limit: usize) -> &str {
    let mut end = limit.min(text.len());

    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}
