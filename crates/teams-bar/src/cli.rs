//! Command-line interface definition.

use clap::{Parser, Subcommand};

/// Menu-bar plugin showing the Teams unread notification count.
///
/// Without a subcommand the plugin prints its menu to stdout.
#[derive(Parser, Debug)]
#[command(name = "teams-bar", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Optional action to perform instead of rendering the menu.
    #[command(subcommand)]
    pub(crate) command: Option<CliCommand>,
}

/// Subcommands invoked by the menu-bar host.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CliCommand {
    /// Asks the watcher to clear its unread counter.
    Reset,
}
