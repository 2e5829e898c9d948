//! Small pure helpers for truncation, redundancy checks and clock labels.

use std::fmt::Display;

use chrono::TimeZone;

/// Shown in place of a clock time that is unknown or out of range.
pub(crate) const UNKNOWN_TIME: &str = "??:??";

/// Cuts `text` to at most `max_chars` characters. Not word-aware.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text.get(..end).unwrap_or(text),
        None => text,
    }
}

/// Returns the message when it adds something beyond the title.
pub(crate) fn distinct_message<'a>(title: &str, message: &'a str) -> Option<&'a str> {
    (!message.is_empty() && message != title).then_some(message)
}

/// Formats epoch milliseconds as `HH:MM` in `zone`.
pub(crate) fn clock_label<Tz>(timestamp_millis: i64, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if timestamp_millis <= 0 {
        return String::from(UNKNOWN_TIME);
    }
    zone.timestamp_millis_opt(timestamp_millis)
        .single()
        .map_or_else(
            || String::from(UNKNOWN_TIME),
            |moment| moment.format("%H:%M").to_string(),
        )
}
