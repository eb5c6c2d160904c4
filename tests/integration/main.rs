//! Integration tests for the idir CLI
//!
//! These run the real binary against a temporary data directory: bootstrap
//! the first officer, issue a token and preview the duty rotation.

mod cli_test;

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo;
use tempfile::TempDir;

/// Helper function to create an idir command
fn idir() -> assert_cmd::Command {
    assert_cmd::Command::new(cargo::cargo_bin!("idir"))
}

/// A data directory plus an empty config file pointing nowhere else
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("idir.toml"), "[rotation]\nduty_size = 2\n").unwrap();
        Self { dir }
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("idir.toml")
    }

    fn data(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    /// `idir --config <ws> ...` with the data dir and secret in the environment
    fn cmd(&self, args: &[&str]) -> assert_cmd::Command {
        let mut cmd = idir();
        cmd.arg("--config")
            .arg(self.config())
            .args(args)
            .current_dir(self.dir.path())
            .env("IDIR_DATA_DIR", self.data())
            .env("IDIR_TOKEN_SECRET", "integration-secret")
            .env_remove("IDIR_PORT");
        cmd
    }
}
