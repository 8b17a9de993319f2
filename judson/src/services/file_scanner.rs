//! Source file scanner
//!
//! Recursive discovery of files to sort. Hidden entries, unreadable entries
//! and the output folder are skipped; only regular files are returned.

use crate::error::{SortError, SortResult};
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Source file scanner
pub struct FileScanner {
    /// Canonical output folder, never descended into
    exclude: Option<PathBuf>,
}

impl FileScanner {
    /// Create new file scanner that skips `exclude` (typically the output folder)
    pub fn new(exclude: Option<&Path>) -> Self {
        Self {
            exclude: exclude.map(|path| path.canonicalize().unwrap_or_else(|_| path.to_path_buf())),
        }
    }

    /// Scan directory for files to sort
    ///
    /// Depth-first, siblings in file-name order. Symlinks are followed;
    /// broken links and loops are logged and skipped.
    pub fn scan(&self, root_path: &Path) -> SortResult<Vec<PathBuf>> {
        let root = verify_readable_dir(root_path)?;

        let walker = WalkDir::new(&root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e));

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    if file_type.is_file() {
                        if is_readable_file(entry.path()) {
                            files.push(entry.into_path());
                        } else {
                            tracing::debug!("Skipping unreadable file: {}", entry.path().display());
                        }
                    } else if !file_type.is_dir() {
                        tracing::warn!(
                            "analyzing {} produced a weird result, not touching this",
                            entry.path().display()
                        );
                    }
                }
                Err(e) => {
                    // Broken symlinks, loops and unreadable directories land here
                    tracing::warn!("Error accessing entry: {}", e);
                }
            }
        }

        tracing::debug!("{} candidate files discovered under {}", files.len(), root.display());

        Ok(files)
    }

    /// Check if entry should be processed
    fn should_process_entry(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }

        if entry.file_name().to_string_lossy().starts_with('.') {
            return false;
        }

        if entry.file_type().is_dir() {
            if let Some(exclude) = &self.exclude {
                let resolved = entry.path().canonicalize().unwrap_or_else(|_| entry.path().to_path_buf());
                if &resolved == exclude {
                    tracing::debug!("Skipping output folder: {}", entry.path().display());
                    return false;
                }
            }
        }

        true
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Canonicalize `path` and check it is a directory we can list
pub fn verify_readable_dir(path: &Path) -> SortResult<PathBuf> {
    let directory_error = |reason: String| SortError::Directory {
        path: path.to_path_buf(),
        reason,
    };

    let canonical = path.canonicalize().map_err(|e| directory_error(e.to_string()))?;
    if !canonical.is_dir() {
        return Err(directory_error("not a directory".to_string()));
    }

    std::fs::read_dir(&canonical).map_err(|e| directory_error(e.to_string()))?;

    Ok(canonical)
}

fn is_readable_file(path: &Path) -> bool {
    File::open(path).is_ok()
}
