//! Menu-bar host line protocol.
//!
//! Each line is either a `---` separator or an item with optional trailing
//! ` | key=value` hints interpreted by the host.

use std::fmt;

const SEPARATOR: &str = "---";

/// Stands in for `|` inside item text, where the host would read a pipe as
/// the start of the hint list.
const PIPE_SUBSTITUTE: &str = "¦";

/// A single `key=value` render or action hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    key: String,
    value: String,
}

impl Hint {
    /// Builds a hint.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = single_line(&self.value);
        if value.contains(char::is_whitespace) || value.contains('"') {
            let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
            write!(formatter, "{}=\"{escaped}\"", self.key)
        } else {
            write!(formatter, "{}={value}", self.key)
        }
    }
}

/// One line of menu output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuLine {
    /// Delimits the status line from the dropdown and groups dropdown items.
    Separator,
    /// Text with optional hints.
    Item {
        /// Visible text.
        text: String,
        /// Trailing hints, in output order.
        hints: Vec<Hint>,
    },
}

impl MenuLine {
    /// A plain item without hints.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Item {
            text: text.into(),
            hints: Vec::new(),
        }
    }

    /// An item carrying hints.
    pub fn with_hints(text: impl Into<String>, hints: Vec<Hint>) -> Self {
        Self::Item {
            text: text.into(),
            hints,
        }
    }
}

impl fmt::Display for MenuLine {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Separator => formatter.write_str(SEPARATOR),
            Self::Item { text, hints } => {
                formatter.write_str(&item_text(text))?;
                for (index, hint) in hints.iter().enumerate() {
                    let lead = if index == 0 { " | " } else { " " };
                    write!(formatter, "{lead}{hint}")?;
                }
                Ok(())
            }
        }
    }
}

/// Flattens `text` onto one line; each line break becomes a space.
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Item text as the host must see it: one line, no hint delimiter.
///
/// Every replacement is a single character, so character counts (and any
/// truncation already applied) are unchanged.
fn item_text(text: &str) -> String {
    single_line(text).replace('|', PIPE_SUBSTITUTE)
}

/// What the host should do when an item is clicked.
///
/// The renderer only describes the action; the host interprets the hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionDescriptor {
    /// Re-run this plugin.
    Refresh,
    /// Run an external program.
    Command {
        /// Executable to run.
        program: String,
        /// Positional parameters.
        params: Vec<String>,
        /// Whether the host should open a terminal for the command.
        terminal: bool,
        /// Whether the host should re-run the plugin afterwards.
        refresh: bool,
    },
}

impl ActionDescriptor {
    /// Background command that re-invokes `program reset`, then refreshes.
    ///
    /// `forwarded` arguments (configuration flags the plugin was started
    /// with) are passed ahead of the subcommand so the reset reaches the same
    /// watcher the menu was read from.
    pub fn reset_command<I>(program: impl Into<String>, forwarded: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut params: Vec<String> = forwarded.into_iter().collect();
        params.push(String::from("reset"));
        Self::Command {
            program: program.into(),
            params,
            terminal: false,
            refresh: true,
        }
    }

    /// Hints encoding this action for the host.
    #[must_use]
    pub fn hints(&self) -> Vec<Hint> {
        match self {
            Self::Refresh => vec![Hint::new("refresh", "true")],
            Self::Command {
                program,
                params,
                terminal,
                refresh,
            } => {
                let mut hints = vec![Hint::new("bash", program.as_str())];
                hints.extend(
                    params
                        .iter()
                        .enumerate()
                        .map(|(index, param)| Hint::new(format!("param{}", index + 1), param.as_str())),
                );
                hints.push(Hint::new("terminal", terminal.to_string()));
                if *refresh {
                    hints.push(Hint::new("refresh", "true"));
                }
                hints
            }
        }
    }
}
