//! Test support utilities for the plugin runtime.
//!
//! Supplies a fake watcher, snapshot helpers and a harness that runs the CLI
//! with captured output so step definitions and unit tests stay focused on
//! their assertions.

mod fake_watcher;

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result, ensure};
use camino::Utf8PathBuf;
use rstest::fixture;
use tempfile::TempDir;
use teams_bar_config::Config;

use crate::{AppError, ConfigLoader, run_with_program};

pub(super) use fake_watcher::{FakeWatcher, RecordedRequest, Reply, unreachable_url};

/// Program path rendered into the reset action during tests.
pub(super) const TEST_PROGRAM: &str = "/opt/teams-bar/bin/teams-bar";

/// A config loader that returns a fixed configuration for tests.
pub(super) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(super) fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Builds a configuration isolated from the developer's machine: the
/// watcher is unreachable and the snapshot lives in `dir`.
pub(super) fn isolated_config(dir: &TempDir) -> Result<Config> {
    let state_file = Utf8PathBuf::from_path_buf(dir.path().join("state.json"))
        .map_err(|path| anyhow::anyhow!("non-utf8 temp path {}", path.display()))?;
    Ok(Config {
        server_url: unreachable_url()?,
        request_timeout_ms: 500,
        state_file,
        ..Config::default()
    })
}

/// Test world holding configuration, the fake watcher and captured output.
pub(super) struct TestWorld {
    pub config: Config,
    pub watcher: Option<FakeWatcher>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<ExitCode>,
    pub requests: Vec<RecordedRequest>,
    _temp_dir: TempDir,
}

impl TestWorld {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("create temp dir")?;
        let config = isolated_config(&temp_dir)?;
        Ok(Self {
            config,
            watcher: None,
            stdout: Vec::new(),
            stderr: Vec::new(),
            exit_code: None,
            requests: Vec::new(),
            _temp_dir: temp_dir,
        })
    }

    pub fn start_watcher(&mut self, reply: Reply) -> Result<()> {
        let watcher = FakeWatcher::spawn(reply)?;
        self.config.server_url = watcher.url();
        self.watcher = Some(watcher);
        Ok(())
    }

    pub fn stop_watcher(&mut self) -> Result<()> {
        self.watcher = None;
        self.config.server_url = unreachable_url()?;
        Ok(())
    }

    pub fn write_snapshot(&self, contents: &str) -> Result<()> {
        fs::write(&self.config.state_file, contents).context("write snapshot")
    }

    pub fn remove_snapshot(&self) -> Result<()> {
        match fs::remove_file(&self.config.state_file) {
            Err(error) if error.kind() != std::io::ErrorKind::NotFound => {
                Err(error).context("remove snapshot")
            }
            _ => Ok(()),
        }
    }

    pub fn run(&mut self, command: &str) -> Result<()> {
        self.stdout.clear();
        self.stderr.clear();
        self.requests.clear();
        let args = build_args(command);
        let loader = StaticConfigLoader::new(self.config.clone());
        let exit = run_with_program(
            args,
            &mut self.stdout,
            &mut self.stderr,
            &loader,
            TEST_PROGRAM,
        );
        self.exit_code = Some(exit);
        if let Some(watcher) = self.watcher.as_mut() {
            self.requests = watcher.take_requests()?;
        }
        Ok(())
    }

    pub fn stdout_text(&self) -> Result<String> {
        String::from_utf8(self.stdout.clone()).context("stdout utf8")
    }

    pub fn stderr_text(&self) -> Result<String> {
        String::from_utf8(self.stderr.clone()).context("stderr utf8")
    }

    pub fn stdout_lines(&self) -> Result<Vec<String>> {
        Ok(self.stdout_text()?.lines().map(str::to_owned).collect())
    }

    pub fn assert_success(&self) -> Result<()> {
        let exit = self.exit_code.context("exit code recorded")?;
        ensure!(exit == ExitCode::SUCCESS, "expected success, got {exit:?}");
        Ok(())
    }

    pub fn assert_requests(&self, expected: &[&str]) -> Result<()> {
        let routes: Vec<String> = self.requests.iter().map(RecordedRequest::route).collect();
        ensure!(
            routes == expected,
            "expected requests {expected:?}, got {routes:?}"
        );
        Ok(())
    }
}

/// Splits a command string into CLI arguments, prefixed with the binary name.
pub(super) fn build_args(command: &str) -> Vec<OsString> {
    let mut args = vec![OsString::from("teams-bar")];
    args.extend(
        command
            .split_whitespace()
            .map(|token| OsString::from(token.trim_matches('"'))),
    );
    args
}

/// A watcher document with `count` unread notifications and one history entry.
pub(super) fn watcher_document(count: u64) -> String {
    format!(
        r#"{{"count": {count}, "last_notification": {{"title": "Ada", "message": "Ship it"}}, "history": [{{"timestamp": 0, "title": "Ada", "message": "Ship it"}}]}}"#
    )
}

#[fixture]
pub(super) fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::new().expect("create test world"))
}
