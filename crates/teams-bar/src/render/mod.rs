//! Renders a [`Resolution`] into menu-bar host lines.
//!
//! Rendering is pure: the caller supplies the time zone used for history
//! timestamps and the action descriptor attached to "Reset Count", so output
//! is fully determined by the arguments.

mod menu;
mod text;

use std::fmt::Display;

use chrono::TimeZone;

pub use menu::{ActionDescriptor, Hint, MenuLine};

use crate::resolver::Resolution;
use crate::state::{HistoryEntry, LastNotification, NotificationState};
use text::{clock_label, distinct_message, truncate_chars};

/// Number of history entries shown under "Recent:".
pub const RECENT_LIMIT: usize = 5;

/// Character cap for the last notification's message.
pub const LAST_MESSAGE_CHARS: usize = 60;

/// Character cap for history messages.
pub const HISTORY_MESSAGE_CHARS: usize = 50;

const STATUS_SIZE: &str = "12";
const ATTENTION_COLOR: &str = "red";
const CLEAR_GLYPH: &str = "🟢";
const ATTENTION_GLYPH: &str = "🔴";
const OFFLINE_GLYPH: &str = "❌";

/// Presentation settings that do not come from the notification state.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Label at the start of the status line.
    pub title: &'a str,
    /// Action attached to the "Reset Count" item.
    pub reset_action: &'a ActionDescriptor,
}

/// Renders `resolution` into an ordered list of menu lines.
///
/// The first line is always the status line and is always followed by a
/// non-empty dropdown body.
pub fn render<Tz>(resolution: &Resolution, options: &RenderOptions<'_>, zone: &Tz) -> Vec<MenuLine>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match resolution.state() {
        Some(state) => render_state(state, options, zone),
        None => render_offline(options),
    }
}

fn render_offline(options: &RenderOptions<'_>) -> Vec<MenuLine> {
    vec![
        MenuLine::with_hints(
            format!("{} {OFFLINE_GLYPH}", options.title),
            vec![Hint::new("size", STATUS_SIZE)],
        ),
        MenuLine::Separator,
        MenuLine::text("Server offline"),
        MenuLine::Separator,
        refresh_line(),
    ]
}

fn render_state<Tz>(state: &NotificationState, options: &RenderOptions<'_>, zone: &Tz) -> Vec<MenuLine>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut lines = vec![
        status_line(state, options.title),
        MenuLine::Separator,
        MenuLine::text(format!("Unread: {}", state.count)),
        MenuLine::Separator,
    ];

    if let Some(last) = state.last_notification.as_ref() {
        push_last_notification(&mut lines, last);
    }

    lines.push(MenuLine::Separator);
    lines.push(refresh_line());
    lines.push(MenuLine::with_hints(
        "Reset Count",
        options.reset_action.hints(),
    ));

    if !state.history.is_empty() {
        lines.push(MenuLine::Separator);
        lines.push(MenuLine::text("Recent:"));
        for (index, entry) in state.recent(RECENT_LIMIT).enumerate() {
            push_history_entry(&mut lines, index + 1, entry, zone);
        }
    }

    lines
}

fn status_line(state: &NotificationState, title: &str) -> MenuLine {
    if state.is_clear() {
        MenuLine::with_hints(
            format!("{title} {CLEAR_GLYPH}"),
            vec![Hint::new("size", STATUS_SIZE)],
        )
    } else {
        MenuLine::with_hints(
            format!("{title} {ATTENTION_GLYPH} {}", state.count),
            vec![
                Hint::new("size", STATUS_SIZE),
                Hint::new("color", ATTENTION_COLOR),
            ],
        )
    }
}

fn push_last_notification(lines: &mut Vec<MenuLine>, last: &LastNotification) {
    let title = last.title();
    match distinct_message(title, last.message()) {
        Some(message) => {
            lines.push(MenuLine::text(format!("Last: {title}")));
            lines.push(MenuLine::text(format!(
                "-- {}",
                truncate_chars(message, LAST_MESSAGE_CHARS)
            )));
        }
        None if !title.is_empty() => lines.push(MenuLine::text(format!("Last: {title}"))),
        None => {}
    }
}

fn push_history_entry<Tz>(lines: &mut Vec<MenuLine>, position: usize, entry: &HistoryEntry, zone: &Tz)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let title = entry.title();
    let clock = clock_label(entry.timestamp_millis, zone);
    lines.push(MenuLine::text(format!("{position}. [{clock}] {title}")));
    if let Some(message) = distinct_message(title, entry.message()) {
        lines.push(MenuLine::text(format!(
            "   {}...",
            truncate_chars(message, HISTORY_MESSAGE_CHARS)
        )));
    }
}

fn refresh_line() -> MenuLine {
    MenuLine::with_hints("Refresh", ActionDescriptor::Refresh.hints())
}
