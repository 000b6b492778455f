use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test harness for running CLI commands against a scratch event file
pub struct CliTestHarness {
    temp_dir: TempDir,
    data_file: PathBuf,
}

impl CliTestHarness {
    /// Create a new test harness with an empty temporary directory
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let data_file = temp_dir.path().join("events.json");

        Self {
            temp_dir,
            data_file,
        }
    }

    /// A Command running inside the temp directory, so a stray agenda.toml is never picked up
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("agenda").expect("Failed to find agenda binary");
        cmd.current_dir(self.temp_dir.path());
        cmd.env("AGENDA_DATA_FILE", &self.data_file);
        cmd.env_remove("RUST_LOG");
        cmd
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Write an agenda.toml into the working directory
    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.temp_dir.path().join("agenda.toml"), contents)
            .expect("Failed to write config");
    }

    pub fn saved_json(&self) -> serde_json::Value {
        let contents = std::fs::read_to_string(&self.data_file).expect("Failed to read event file");
        serde_json::from_str(&contents).expect("Event file is not JSON")
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }
}

/// Common test fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub fn standup_args() -> Vec<&'static str> {
        vec![
            "add", "Standup",
            "--start", "2030-01-07 09:00",
            "--duration", "15",
            "--every", "daily",
            "--count", "5",
        ]
    }

    pub fn meeting_args() -> Vec<&'static str> {
        vec![
            "add", "Planning",
            "--start", "2030-01-09 09:10",
            "--end", "2030-01-09 10:00",
            "--category", "Work",
            "--priority", "high",
        ]
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    pub fn event_created_successfully() -> impl Predicate<str> {
        predicate::str::contains("✓").and(predicate::str::contains("Created"))
    }

    pub fn has_event_table_headers() -> impl Predicate<str> {
        predicate::str::contains("ID")
            .and(predicate::str::contains("Title"))
            .and(predicate::str::contains("Start"))
    }

    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }
}
