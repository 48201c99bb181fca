//! Common test utilities for integration tests.
//!
//! This module provides helper functions and fixture builders for testing
//! the figtree library against real directory trees.

use std::fs;
use std::path::PathBuf;

use figtree::{Explorer, ExplorerBuilder, ExplorerSync};
use tempfile::TempDir;

/// A temporary directory tree of configuration files.
///
/// Files are written relative to the tree root; parent directories are
/// created on demand. The tree is removed when the fixture drops.
pub struct ConfigTree {
    #[allow(dead_code)]
    temp_dir: TempDir,
    root: PathBuf,
}

#[allow(dead_code)]
impl ConfigTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self { temp_dir, root }
    }

    /// The root of the tree.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Write a file, creating parent directories as needed.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&path, contents).expect("Failed to write file");
        path
    }

    /// Create a directory.
    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.root.join(relative);
        fs::create_dir_all(&path).expect("Failed to create dir");
        path
    }

    /// Path of a file under the tree (may not exist).
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// A builder pinned to this tree so meta discovery stays hermetic.
    pub fn builder(&self, module_name: &str) -> ExplorerBuilder {
        ExplorerSync::builder(module_name).with_meta_search_dir(self.root.clone())
    }

    /// A sync explorer with defaults for this tree.
    pub fn explorer_sync(&self, module_name: &str) -> ExplorerSync {
        self.builder(module_name)
            .build_sync()
            .expect("Failed to build explorer")
    }

    /// An async explorer with defaults for this tree.
    pub fn explorer(&self, module_name: &str) -> Explorer {
        self.builder(module_name)
            .build()
            .expect("Failed to build explorer")
    }
}
