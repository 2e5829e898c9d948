//! Client for the live notification watcher.
//!
//! The watcher exposes `GET /status` and `POST /reset` on a local port. Every
//! request is bounded by the configured timeout and any failure, whether a
//! refused connection, a timeout, an error status or an undecodable body,
//! surfaces as a [`SourceError`] describing why live data is unavailable.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use teams_bar_config::{Config, EndpointError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::state::{self, NotificationState};

/// A provider of live notification state.
pub trait StateSource {
    /// Fetches the current state.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when live state is unavailable. Callers treat
    /// this as an expected outcome rather than a failure.
    fn fetch(&self) -> Result<NotificationState, SourceError>;

    /// Asks the watcher to clear its unread counter.
    ///
    /// Returns whether the request completed without a transport error. The
    /// response itself is not inspected.
    fn reset_count(&self) -> bool;
}

/// [`StateSource`] backed by the watcher's HTTP endpoints.
#[derive(Debug, Clone, Copy)]
pub struct HttpStateSource<'a> {
    config: &'a Config,
}

impl<'a> HttpStateSource<'a> {
    /// Creates a source that talks to the watcher described by `config`.
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }

    fn timeout(&self) -> Duration {
        self.config.request_timeout()
    }

    fn client(&self) -> Result<Client, SourceError> {
        Client::builder()
            .connect_timeout(self.timeout())
            .timeout(self.timeout())
            .no_proxy()
            .build()
            .map_err(SourceError::Client)
    }

    fn post_reset(&self) -> Result<StatusCode, SourceError> {
        let url = self.config.reset_endpoint()?;
        let response = self
            .client()?
            .post(url)
            .body(Vec::new())
            .send()
            .map_err(SourceError::Request)?;
        Ok(response.status())
    }
}

impl StateSource for HttpStateSource<'_> {
    fn fetch(&self) -> Result<NotificationState, SourceError> {
        let url = self.config.status_endpoint()?;
        debug!(target: "teams_bar::source", %url, "requesting live state");
        let response = self
            .client()?
            .get(url)
            .send()
            .map_err(SourceError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status));
        }

        let body = response.bytes().map_err(SourceError::Request)?;
        state::decode(&body).map_err(SourceError::Body)
    }

    fn reset_count(&self) -> bool {
        match self.post_reset() {
            Ok(status) => {
                info!(target: "teams_bar::source", %status, "reset request delivered");
                true
            }
            Err(error) => {
                warn!(target: "teams_bar::source", %error, "reset request failed");
                false
            }
        }
    }
}

/// Reasons live state could not be obtained.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The configured server URL does not yield a usable endpoint.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    /// The request failed to connect, timed out, or broke mid-transfer.
    #[error("request to watcher failed: {0}")]
    Request(#[source] reqwest::Error),
    /// The watcher answered with a non-success status.
    #[error("watcher responded with status {0}")]
    Status(StatusCode),
    /// The response body is not a valid state document.
    #[error("watcher returned a malformed state document: {0}")]
    Body(#[source] serde_json::Error),
}
