//! Notification state shared by the live watcher and the persisted snapshot.
//!
//! Both sources speak the same JSON shape. Decoding is lenient per field (a
//! bad count or timestamp degrades to zero, a non-string title is shown as
//! written or dropped) but strict about the document as a whole: anything
//! other than a JSON object is rejected.

use serde::de::{self, Deserializer, Unexpected};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder shown when a notification carries no title.
pub const TITLE_PLACEHOLDER: &str = "N/A";

/// Snapshot of the watcher's unread count and recent notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationState {
    /// Number of unread notifications.
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: u64,
    /// Most recent notification, if the watcher has seen one.
    #[serde(
        default,
        deserialize_with = "present_notification",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_notification: Option<LastNotification>,
    /// Notification history, oldest first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<HistoryEntry>,
}

/// The single most recent notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastNotification {
    /// Notification title.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    /// Notification body.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<String>,
}

/// One entry of the notification history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unix epoch milliseconds; zero or less means the time is unknown.
    #[serde(
        rename = "timestamp",
        default,
        deserialize_with = "lenient_timestamp"
    )]
    pub timestamp_millis: i64,
    /// Notification title.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    /// Notification body.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<String>,
    /// Event kind reported by the watcher (for example `status_away`).
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
}

impl NotificationState {
    /// Returns true when no notification is pending.
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        self.count == 0
    }

    /// Iterates over at most `limit` history entries, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter().rev().take(limit)
    }
}

impl LastNotification {
    /// Title, or [`TITLE_PLACEHOLDER`] when absent.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(TITLE_PLACEHOLDER)
    }

    /// Message, or the empty string when absent.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    fn is_empty(&self) -> bool {
        self.title.is_none() && self.message.is_none()
    }
}

impl HistoryEntry {
    /// Title, or [`TITLE_PLACEHOLDER`] when absent.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(TITLE_PLACEHOLDER)
    }

    /// Message, or the empty string when absent.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

/// Decodes a state document received from the watcher or read from disk.
///
/// # Errors
///
/// Returns an error when the bytes are not JSON, when the document is not an
/// object, or when a structural field (such as `history`) has the wrong shape.
pub fn decode(bytes: &[u8]) -> Result<NotificationState, serde_json::Error> {
    let document: Value = serde_json::from_slice(bytes)?;
    if !document.is_object() {
        return Err(de::Error::invalid_type(
            unexpected(&document),
            &"a JSON object",
        ));
    }
    serde_json::from_value(document)
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(flag) => Unexpected::Bool(*flag),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(text) => Unexpected::Str(text),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let count = match value {
        Some(Value::Number(number)) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite() && *float >= 0.0)
                .map(|float| float as u64)
        }),
        _ => None,
    };
    Ok(count.unwrap_or_default())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let millis = match value {
        Some(Value::Number(number)) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite())
                .map(|float| float as i64)
        }),
        _ => None,
    };
    Ok(millis.unwrap_or_default())
}

/// Strings pass through; numbers and booleans are shown as written. Any
/// other value is treated as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}

fn present_notification<'de, D>(deserializer: D) -> Result<Option<LastNotification>, D::Error>
where
    D: Deserializer<'de>,
{
    let notification = Option::<LastNotification>::deserialize(deserializer)?;
    Ok(notification.filter(|notification| !notification.is_empty()))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
