//! Entrypoint for the `teams-bar` menu-bar plugin.
//!
//! The binary delegates to [`teams_bar::run`], which loads configuration,
//! resolves notification state and prints the menu for the host.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    teams_bar::run(std::env::args_os(), &mut stdout, &mut stderr)
}
