//! Test Helper Utilities
//!
//! Shared utilities for testing judson

pub mod fake_reader;

pub use fake_reader::{fingerprinted, FakeTagReader};

use std::fs;
use std::path::{Path, PathBuf};

/// Write `contents` to `root/relative`, creating parent folders
pub fn write_file(root: &Path, relative: &str, contents: &[u8]) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}
