//! Transport seam for remote reads.

use std::time::Duration;

use comma_core::errors::{CommaError, ErrorInfo};
use comma_core::RemoteConfig;
use reqwest::blocking::Client as HttpClient;
use tracing::debug;

/// Anything that can return the body of a GET request.
///
/// Calls are sequential and unretried; a failure is terminal for the caller.
pub trait RemoteSource {
    /// Returns the body of `url`, failing on transport errors and non-2xx statuses.
    fn get(&self, url: &str) -> Result<Vec<u8>, CommaError>;
}

fn fetch_error(code: &str, url: &str, err: impl ToString) -> CommaError {
    CommaError::Fetch(ErrorInfo::new(code, err.to_string()).with_context("url", url))
}

/// [`RemoteSource`] backed by a blocking HTTP client.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: HttpClient,
}

impl HttpSource {
    pub fn new(timeout: Option<Duration>) -> Result<Self, CommaError> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| CommaError::Fetch(ErrorInfo::new("comma_data.http_client", err.to_string())))?;
        Ok(Self { client })
    }

    pub fn from_config(remote: &RemoteConfig) -> Result<Self, CommaError> {
        Self::new(remote.timeout_secs.map(Duration::from_secs))
    }
}

impl RemoteSource for HttpSource {
    fn get(&self, url: &str) -> Result<Vec<u8>, CommaError> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| fetch_error("comma_data.http_send", url, err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(CommaError::Fetch(
                ErrorInfo::new(
                    "comma_data.http_status",
                    format!("GET {url} returned {status}"),
                )
                .with_context("url", url)
                .with_context("status", status.as_u16().to_string()),
            ));
        }
        let bytes = response
            .bytes()
            .map_err(|err| fetch_error("comma_data.http_body", url, err))?;
        Ok(bytes.to_vec())
    }
}
