use camino::Utf8PathBuf;

/// Base URL of the local notification watcher.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:9876";

/// Upper bound for a single request against the watcher, in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 2_000;

/// File name of the snapshot the watcher persists in the home directory.
pub const STATE_FILE_NAME: &str = ".teams_notifier_state.json";

/// Label printed at the start of the menu-bar status line.
pub const DEFAULT_TITLE: &str = "Teams";

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Owned server URL used where allocation is required (e.g. serde).
pub fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_owned()
}

/// Default request timeout in milliseconds.
pub fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Owned status line title.
pub fn default_title() -> String {
    DEFAULT_TITLE.to_owned()
}

/// Default log filter expression used by the binary.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Compact
}

/// Computes the default snapshot path, `~/.teams_notifier_state.json`.
///
/// Falls back to the bare file name (relative to the working directory) when
/// the home directory cannot be determined or is not valid UTF-8.
pub fn default_state_file() -> Utf8PathBuf {
    dirs::home_dir()
        .and_then(|home| Utf8PathBuf::from_path_buf(home).ok())
        .map_or_else(
            || Utf8PathBuf::from(STATE_FILE_NAME),
            |home| home.join(STATE_FILE_NAME),
        )
}
