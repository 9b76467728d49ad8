use time::UtcOffset;

use crate::{Error, RequestClient, timezone::get_local_offset};

/// Settings for talking to the API and displaying its data.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    api_url: String,
    local_offset: UtcOffset,
}

impl ClientConfig {
    /// Create the config from the API base URL and a canonical timezone name
    /// such as "Europe/Moscow".
    ///
    /// `api_url` gets a trailing slash if it lacks one so that entity paths
    /// are resolved beneath it rather than replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidTimezone] if the timezone is unknown.
    pub fn new(api_url: &str, timezone: &str) -> Result<Self, Error> {
        let local_offset = get_local_offset(timezone)
            .ok_or_else(|| Error::InvalidTimezone(timezone.to_owned()))?;

        let api_url = if api_url.ends_with('/') {
            api_url.to_owned()
        } else {
            format!("{api_url}/")
        };

        Ok(Self {
            api_url,
            local_offset,
        })
    }

    /// The base URL of the API, always ending with `/`.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// The UTC offset timestamps are displayed in.
    pub fn local_offset(&self) -> UtcOffset {
        self.local_offset
    }

    /// A request client that resolves paths against the API URL.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidRequest] if the API URL is not an absolute URL.
    pub fn request_client(&self) -> Result<RequestClient, Error> {
        RequestClient::with_base_url(&self.api_url)
    }
}
