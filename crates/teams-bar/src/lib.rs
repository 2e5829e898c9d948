//! Menu-bar status plugin for the Teams notification watcher.
//!
//! Each invocation resolves the freshest notification state (live watcher,
//! then persisted snapshot, then offline), renders it in the menu-bar host's
//! line protocol and exits. The host re-runs the plugin on its own schedule.
//!
//! Failures never escape as a non-zero exit while rendering: every error path
//! has a textual fallback so the host always has something to draw.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use teams_bar_config::Config;
use tracing::debug;

mod cli;
mod config;
mod errors;
pub mod render;
pub mod resolver;
pub mod source;
pub mod state;
pub mod store;
pub mod telemetry;

use cli::{Cli, CliCommand};
use config::{ConfigLoader, OrthoConfigLoader, command_arguments, split_config_arguments};
pub(crate) use errors::AppError;
pub use render::{ActionDescriptor, Hint, MenuLine, RenderOptions, render};
pub use resolver::{Resolution, resolve};
pub use source::{HttpStateSource, SourceError, StateSource};
pub use state::{HistoryEntry, LastNotification, NotificationState};
pub use store::{StateStore, StoreError};

/// Name used for the reset action when the running executable cannot be
/// located.
const BINARY_NAME: &str = "teams-bar";

struct CliRunner<'a, W: Write, E: Write, L: ConfigLoader> {
    stdout: &'a mut W,
    stderr: &'a mut E,
    loader: &'a L,
    program: Option<String>,
}

impl<'a, W, E, L> CliRunner<'a, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    fn new(stdout: &'a mut W, stderr: &'a mut E, loader: &'a L) -> Self {
        Self {
            stdout,
            stderr,
            loader,
            program: None,
        }
    }

    #[cfg(test)]
    fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);

        let cli = match Cli::try_parse_from(command_arguments(&args, &split)) {
            Ok(cli) => cli,
            Err(error) => return self.report_usage(&error),
        };

        let config = self.load_config(&split.config_arguments);
        if let Err(error) = telemetry::initialise(&config) {
            let _ = writeln!(self.stderr, "{}", AppError::from(error));
        }

        match cli.command {
            Some(CliCommand::Reset) => request_reset(&config),
            None => self.emit_menu(&config, &split.config_arguments),
        }
    }

    fn report_usage(&mut self, error: &clap::Error) -> ExitCode {
        let rendered = error.render().to_string();
        if error.use_stderr() {
            write_usage(&mut *self.stderr, &rendered);
        } else {
            write_usage(&mut *self.stdout, &rendered);
        }
        exit_code_from_status(error.exit_code())
    }

    fn load_config(&mut self, config_arguments: &[OsString]) -> Config {
        match self.loader.load(config_arguments) {
            Ok(config) => config,
            Err(error) => {
                let _ = writeln!(self.stderr, "{error}; using defaults");
                Config::default()
            }
        }
    }

    fn emit_menu(&mut self, config: &Config, config_arguments: &[OsString]) -> ExitCode {
        let source = HttpStateSource::new(config);
        let store = StateStore::new(config.state_file().to_path_buf());
        let resolution = resolve(&source, &store);

        let reset_action =
            ActionDescriptor::reset_command(self.program(), forwarded_arguments(config_arguments));
        let options = RenderOptions {
            title: config.title(),
            reset_action: &reset_action,
        };
        let lines = render(&resolution, &options, &Local);

        if let Err(error) = write_menu(&mut *self.stdout, &lines) {
            let _ = writeln!(self.stderr, "{error}");
        }
        ExitCode::SUCCESS
    }

    fn program(&self) -> String {
        self.program.clone().unwrap_or_else(current_program)
    }
}

/// Runs the plugin using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdout, stderr, &OrthoConfigLoader)
}

/// Runs the plugin with a custom configuration loader.
pub(crate) fn run_with_loader<I, W, E, L>(
    args: I,
    stdout: &mut W,
    stderr: &mut E,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(stdout, stderr, loader).run(args)
}

/// Runs the plugin with a fixed program path for the reset action.
#[cfg(test)]
pub(crate) fn run_with_program<I, W, E, L>(
    args: I,
    stdout: &mut W,
    stderr: &mut E,
    loader: &L,
    program: &str,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(stdout, stderr, loader)
        .with_program(program)
        .run(args)
}

fn request_reset(config: &Config) -> ExitCode {
    let delivered = HttpStateSource::new(config).reset_count();
    debug!(target: "teams_bar", delivered, "reset action finished");
    ExitCode::SUCCESS
}

fn write_menu<W>(stdout: &mut W, lines: &[MenuLine]) -> Result<(), AppError>
where
    W: Write,
{
    for line in lines {
        writeln!(stdout, "{line}").map_err(AppError::Emit)?;
    }
    stdout.flush().map_err(AppError::Emit)
}

fn write_usage<W>(target: &mut W, rendered: &str)
where
    W: Write,
{
    let _ = target.write_all(rendered.as_bytes());
    let _ = target.flush();
}

/// Configuration flags to replay when the host runs the reset action. The
/// first entry is the program name and is dropped.
fn forwarded_arguments(config_arguments: &[OsString]) -> Vec<String> {
    config_arguments
        .iter()
        .skip(1)
        .map(|argument| argument.to_string_lossy().into_owned())
        .collect()
}

fn current_program() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.to_str().map(str::to_owned))
        .unwrap_or_else(|| String::from(BINARY_NAME))
}

fn exit_code_from_status(status: i32) -> ExitCode {
    u8::try_from(status).map_or(ExitCode::FAILURE, ExitCode::from)
}
