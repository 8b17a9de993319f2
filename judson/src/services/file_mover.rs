//! File relocation
//!
//! A move runs through [`MoveStage`]s in order:
//! `Pending -> DirectoryEnsured -> Copied -> SourceRemoved`.
//! Up to and including the copy, any failure leaves the source untouched.
//! The source is deleted only after the copy is verified, and a failed
//! delete does not undo the move: the copy at the destination is
//! authoritative.

use crate::error::{SortError, SortResult};
use crate::models::DestinationPath;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Progress of one move
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MoveStage {
    Pending,
    DirectoryEnsured,
    Copied,
    SourceRemoved,
}

impl fmt::Display for MoveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoveStage::Pending => "pending",
            MoveStage::DirectoryEnsured => "directory ensured",
            MoveStage::Copied => "copied",
            MoveStage::SourceRemoved => "source removed",
        };
        f.write_str(name)
    }
}

/// Result of a completed move
#[derive(Debug)]
pub struct MoveReport {
    /// Final location of the file
    pub destination: PathBuf,
    /// `SourceRemoved`, or `Copied` when the source could not be deleted
    pub stage: MoveStage,
    /// Why the source is still present, if it is
    pub cleanup_error: Option<SortError>,
}

impl MoveReport {
    pub fn source_removed(&self) -> bool {
        self.stage == MoveStage::SourceRemoved
    }
}

/// Moves files into an output folder
#[derive(Debug, Clone)]
pub struct FileMover {
    output_root: PathBuf,
}

impl FileMover {
    /// Create a mover rooted at `output_root`
    ///
    /// The root itself is not touched until the first move; use
    /// [`ensure_directory`] to validate it up front.
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    /// Move `source` to `destination` under the output root
    pub fn relocate(&self, source: &Path, destination: &DestinationPath) -> SortResult<MoveReport> {
        self.relocate_with(source, destination, |path| fs::remove_file(path))
    }

    fn relocate_with<F>(&self, source: &Path, destination: &DestinationPath, remove_source: F) -> SortResult<MoveReport>
    where
        F: FnOnce(&Path) -> io::Result<()>,
    {
        let mut stage = MoveStage::Pending;
        debug!(file = %source.display(), stage = %stage, "Moving file");

        let folder = ensure_directory(&self.output_root.join(&destination.folder_name))?;
        stage = MoveStage::DirectoryEnsured;
        debug!(folder = %folder.display(), stage = %stage, "Destination folder ready");

        let target = folder.join(&destination.file_name);
        copy_file(source, &target)?;
        stage = MoveStage::Copied;
        debug!(destination = %target.display(), stage = %stage, "Copy verified");

        let cleanup_error = match remove_source(source) {
            Ok(()) => {
                stage = MoveStage::SourceRemoved;
                None
            }
            Err(e) => Some(SortError::SourceCleanup {
                file: source.to_path_buf(),
                reason: e.to_string(),
            }),
        };
        debug!(file = %source.display(), stage = %stage, "Move finished");

        Ok(MoveReport {
            destination: target,
            stage,
            cleanup_error,
        })
    }
}

/// Create `path` (and parents) if missing, then check it is readable and writable
///
/// Idempotent. Returns the path on success.
pub fn ensure_directory(path: &Path) -> SortResult<PathBuf> {
    if !path.is_dir() {
        create_dir(path).map_err(|e| SortError::Create {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!("Created directory {}", path.display());
    }

    if fs::read_dir(path).is_err() {
        return Err(SortError::Permission {
            path: path.to_path_buf(),
            access: "read",
        });
    }

    if !is_writable(path) {
        return Err(SortError::Permission {
            path: path.to_path_buf(),
            access: "write to",
        });
    }

    Ok(path.to_path_buf())
}

#[cfg(unix)]
fn create_dir(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o755).create(path)
}

#[cfg(not(unix))]
fn create_dir(path: &Path) -> io::Result<()> {
    fs::DirBuilder::new().recursive(true).create(path)
}

const WRITE_CHECK_ATTEMPTS: u32 = 8;

fn write_check_name(attempt: u32) -> String {
    format!(".judson-write-check-{}-{}", std::process::id(), attempt)
}

/// Check write access by creating and removing a hidden file
///
/// Leftover check files from a crashed run are stepped over, never trusted.
fn is_writable(dir: &Path) -> bool {
    for attempt in 0..WRITE_CHECK_ATTEMPTS {
        let check = dir.join(write_check_name(attempt));
        match OpenOptions::new().write(true).create_new(true).open(&check) {
            Ok(file) => {
                drop(file);
                if let Err(e) = fs::remove_file(&check) {
                    warn!("Could not remove write check file {}: {}", check.display(), e);
                }
                return true;
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(_) => return false,
        }
    }

    warn!("Every write check name in {} is taken", dir.display());
    false
}

/// Copy `source` to a new file at `target`
///
/// Fails with `Collision` if `target` exists. The destination is created with
/// `create_new`, so the check and the creation are one step.
fn copy_file(source: &Path, target: &Path) -> SortResult<()> {
    if target.exists() {
        return Err(SortError::Collision {
            destination: target.to_path_buf(),
        });
    }

    let mut input = File::open(source).map_err(|e| copy_error(source, target, e.to_string()))?;
    let expected = input
        .metadata()
        .map_err(|e| copy_error(source, target, e.to_string()))?
        .len();

    write_new(&mut input, expected, source, target)
}

/// Stream `input` into a freshly created `target` and check `expected` bytes
/// arrived. On failure the partial destination is removed on a best-effort
/// basis.
fn write_new<R: Read>(input: &mut R, expected: u64, source: &Path, target: &Path) -> SortResult<()> {
    let mut output = match OpenOptions::new().write(true).create_new(true).open(target) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(SortError::Collision {
                destination: target.to_path_buf(),
            });
        }
        Err(e) => return Err(copy_error(source, target, e.to_string())),
    };

    let written = io::copy(input, &mut output)
        .and_then(|written| output.flush().map(|()| written))
        .and_then(|written| output.sync_all().map(|()| written));
    drop(output);

    let failure = match written {
        Ok(written) if written == expected => None,
        Ok(written) => Some(format!("wrote {} of {} bytes", written, expected)),
        Err(e) => Some(e.to_string()),
    };

    match failure {
        None => Ok(()),
        Some(reason) => {
            if let Err(e) = fs::remove_file(target) {
                warn!("Could not remove partial copy {}: {}", target.display(), e);
            }
            Err(copy_error(source, target, reason))
        }
    }
}

fn copy_error(source: &Path, target: &Path, reason: String) -> SortError {
    SortError::Copy {
        file: source.to_path_buf(),
        destination: target.to_path_buf(),
        reason,
    }
}
