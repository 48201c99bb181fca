//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers for common patterns
//! - Test data fixtures

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test environment with an isolated directory tree.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            temp_path,
        }
    }

    /// Get a command builder for the figtree binary.
    pub fn command(&self) -> Command {
        Command::cargo_bin("figtree").expect("Failed to find figtree binary")
    }

    /// Write a file under the test directory, creating parents as needed.
    pub fn write_file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Create a directory under the test directory.
    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.temp_path.join(relative);
        fs::create_dir_all(&path).expect("Failed to create dir");
        path
    }

    /// Path to a file under the test directory.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp_path.join(relative)
    }
}

/// Render a path as a string for CLI arguments.
#[allow(dead_code)]
pub fn arg(path: &Path) -> String {
    path.display().to_string()
}
