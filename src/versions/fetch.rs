//! HTTP access to the version manifest.
//!
//! Failures are mapped onto [`NetworkErrorKind`] with a message a user can
//! act on, rather than a raw transport error.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;

use crate::error::{CiaoError, NetworkErrorKind, Result};

/// Fetches plain-text documents over HTTP.
pub struct HttpFetcher {
    client: Client,
    timeout: Option<Duration>,
}

impl HttpFetcher {
    /// Create a fetcher. `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ciao-contrib/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| CiaoError::Other(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Fetch `url` as text.
    ///
    /// # Errors
    ///
    /// Returns `Network` with the failure classified; a 404 is
    /// [`NetworkErrorKind::NotFound`] so callers can try another URL.
    pub fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!("querying URL={} timeout={:?}", url, self.timeout);

        let response = self.client.get(url).send().map_err(classify_transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(network(
                NetworkErrorKind::NotFound,
                "The CIAO version file appears to be unreachable.".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(network(
                NetworkErrorKind::Http,
                format!("Unable to reach the CIAO site - HTTP {}", status),
            ));
        }

        response.text().map_err(|e| {
            network(
                NetworkErrorKind::Other,
                format!("Unable to access the CIAO version file - {}", e),
            )
        })
    }
}

fn network(kind: NetworkErrorKind, message: String) -> CiaoError {
    CiaoError::Network { kind, message }
}

fn classify_transport(err: reqwest::Error) -> CiaoError {
    if err.is_timeout() {
        network(
            NetworkErrorKind::Http,
            format!("Unable to reach the CIAO site - {}", err),
        )
    } else if err.is_connect() {
        network(
            NetworkErrorKind::Unreachable,
            "Unable to reach the CIAO site - is the network down?".to_string(),
        )
    } else {
        network(
            NetworkErrorKind::Other,
            format!("Unable to access the CIAO version file - {}", err),
        )
    }
}
