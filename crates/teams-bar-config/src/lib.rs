//! Shared configuration for the Teams menu-bar status plugin.
//!
//! Settings are layered by `ortho_config`: built-in defaults, then an optional
//! `teams-bar.toml`, then `TEAMS_BAR_*` environment variables, then command
//! line flags. The plugin treats a failed load as "use the defaults" because
//! the menu-bar host must always receive renderable output.

mod defaults;
mod logging;

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SERVER_URL, DEFAULT_TITLE,
    STATE_FILE_NAME, default_log_filter, default_log_filter_string, default_log_format,
    default_request_timeout_ms, default_server_url, default_state_file, default_title,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Path of the live status endpoint relative to [`Config::server_url`].
pub const STATUS_PATH: &str = "status";

/// Path of the counter reset endpoint relative to [`Config::server_url`].
pub const RESET_PATH: &str = "reset";

/// Runtime configuration for the plugin binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, OrthoConfig)]
#[ortho_config(
    prefix = "TEAMS_BAR",
    discovery(
        app_name = "teams-bar",
        env_var = "TEAMS_BAR_CONFIG_PATH",
        config_file_name = "teams-bar.toml",
        dotfile_name = ".teams-bar.toml",
        config_cli_long = "config-path",
        config_cli_visible = true,
    )
)]
pub struct Config {
    /// Base URL of the local notification watcher.
    #[ortho_config(default = default_server_url())]
    pub server_url: String,
    /// Bound on each request to the watcher, in milliseconds.
    #[ortho_config(default = default_request_timeout_ms())]
    pub request_timeout_ms: u64,
    /// Snapshot written by the watcher and read when it is unreachable.
    #[ortho_config(default = default_state_file())]
    pub state_file: Utf8PathBuf,
    /// Label printed at the start of the status line.
    #[ortho_config(default = default_title())]
    pub title: String,
    /// `tracing` filter expression for diagnostics on stderr.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Diagnostic output format.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            request_timeout_ms: default_request_timeout_ms(),
            state_file: default_state_file(),
            title: default_title(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Base URL of the watcher as configured.
    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Request timeout; zero is raised to one millisecond so requests stay
    /// bounded.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }

    /// Location of the persisted snapshot.
    #[must_use]
    pub fn state_file(&self) -> &Utf8Path {
        self.state_file.as_path()
    }

    /// Status line label.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Resolves `path` against the configured server URL.
    ///
    /// A base without a trailing slash is treated as a directory so that
    /// `http://host:9876/api` yields `http://host:9876/api/status`.
    pub fn endpoint(&self, path: &str) -> Result<Url, EndpointError> {
        let mut base = Url::parse(&self.server_url).map_err(|source| EndpointError::Parse {
            url: self.server_url.clone(),
            source,
        })?;
        if base.cannot_be_a_base() {
            return Err(EndpointError::NotABase {
                url: self.server_url.clone(),
            });
        }
        if !base.path().ends_with('/') {
            let directory = format!("{}/", base.path());
            base.set_path(&directory);
        }
        base.join(path).map_err(|source| EndpointError::Parse {
            url: self.server_url.clone(),
            source,
        })
    }

    /// URL of the live status endpoint.
    pub fn status_endpoint(&self) -> Result<Url, EndpointError> {
        self.endpoint(STATUS_PATH)
    }

    /// URL of the counter reset endpoint.
    pub fn reset_endpoint(&self) -> Result<Url, EndpointError> {
        self.endpoint(RESET_PATH)
    }
}

/// Errors raised while deriving watcher endpoints from the server URL.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// The server URL is not a valid absolute URL.
    #[error("invalid server url '{url}': {source}")]
    Parse {
        /// The configured server URL.
        url: String,
        /// Underlying parse failure.
        #[source]
        source: url::ParseError,
    },
    /// The server URL cannot have paths joined onto it (for example `mailto:`).
    #[error("server url '{url}' cannot be used as a base")]
    NotABase {
        /// The configured server URL.
        url: String,
    },
}
