//! Output format for the plugin's diagnostic log.
//!
//! The menu-bar host only reads stdout and usually discards stderr, so the
//! log is read by a person running the plugin by hand (`compact`) or by a
//! wrapper that captures stderr to a file (`json`).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How diagnostic events are written to stderr.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event, fields flattened to the top level.
    Json,
    /// One short human-readable line per event.
    #[default]
    Compact,
}

impl LogFormat {
    /// Whether events are emitted as machine-readable records.
    #[must_use]
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Error returned when `--log-format` or `TEAMS_BAR_LOG_FORMAT` names an
/// unknown format.
pub type LogFormatParseError = strum::ParseError;
