//! Sorting engine
//!
//! A [`Librarian`] owns one source folder and one output folder. It finds the
//! files to sort, then sorts them one at a time: read tags, check the
//! fingerprint tag, resolve display fields, build the destination, move.
//! A failure on one file never stops the batch.

use crate::error::{SortError, SortResult};
use crate::services::file_mover::{ensure_directory, FileMover, MoveReport};
use crate::services::file_scanner::{verify_readable_dir, FileScanner};
use crate::services::metadata_extractor::{LoftyTagReader, TagReader};
use crate::services::{build_destination, FieldResolver};
use crate::models::TagBundle;
use judson_common::TomlConfig;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Tag policy settings
#[derive(Debug, Clone)]
pub struct SortSettings {
    /// Key fragment identifying the fingerprint tag
    pub fingerprint_tag: String,
    /// Tag namespaces in lookup priority order
    pub namespaces: Vec<String>,
}

impl Default for SortSettings {
    fn default() -> Self {
        Self::from_config(&TomlConfig::default())
    }
}

impl SortSettings {
    pub fn from_config(config: &TomlConfig) -> Self {
        Self {
            fingerprint_tag: config.fingerprint_tag.clone(),
            namespaces: config.namespaces.clone(),
        }
    }
}

/// Outcome for one file of a batch
#[derive(Debug)]
pub struct FileOutcome {
    pub file: PathBuf,
    pub result: SortResult<MoveReport>,
}

/// Batch totals
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Files considered
    pub total: usize,
    /// Files now at their destination
    pub sorted: usize,
    /// Sorted files whose source could not be deleted
    pub stale_sources: usize,
    /// Skipped files with the reason they were skipped
    pub skipped: Vec<(PathBuf, String)>,
}

impl RunSummary {
    /// Files left unsorted
    pub fn remaining(&self) -> usize {
        self.total - self.sorted
    }

    /// Count one file's outcome
    pub fn record(&mut self, outcome: &FileOutcome) {
        let file = &outcome.file;
        match &outcome.result {
            Ok(report) => {
                self.sorted += 1;
                info!(file = %file.display(), destination = %report.destination.display(), "Sorted");
                if let Some(e) = &report.cleanup_error {
                    self.stale_sources += 1;
                    warn!(file = %file.display(), "{}", e);
                }
            }
            Err(e) => {
                warn!(file = %file.display(), "{}; file skipped", e);
                self.skipped.push((file.clone(), e.to_string()));
            }
        }
    }
}

/// Sorts audio files from a source folder into an output folder
pub struct Librarian<R: TagReader = LoftyTagReader> {
    source: PathBuf,
    destination: PathBuf,
    reader: R,
    resolver: FieldResolver,
    mover: FileMover,
}

impl<R: TagReader> Librarian<R> {
    /// Create a librarian
    ///
    /// The source must exist and be readable. The destination is created if
    /// missing and must be readable and writable. Errors here are fatal to a run.
    pub fn new(source: &Path, destination: &Path, reader: R, settings: SortSettings) -> SortResult<Self> {
        let source = verify_readable_dir(source)?;

        let destination = ensure_directory(destination)?;
        let destination = destination.canonicalize().map_err(|e| SortError::Directory {
            path: destination.clone(),
            reason: e.to_string(),
        })?;

        info!("Source: {}", source.display());
        info!("Destination: {}", destination.display());

        Ok(Self {
            resolver: FieldResolver::new(settings.namespaces, settings.fingerprint_tag),
            mover: FileMover::new(destination.clone()),
            source,
            destination,
            reader,
        })
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Files under the source folder, excluding the destination folder
    pub fn source_files(&self) -> SortResult<Vec<PathBuf>> {
        FileScanner::new(Some(&self.destination)).scan(&self.source)
    }

    /// Sort one file, returning where it ended up
    pub fn sort(&self, file: &Path) -> SortResult<MoveReport> {
        let bundle = self.read_tags(file)?;
        let plan = self.resolver.plan(file, &bundle)?;
        let destination = build_destination(file, &plan)?;
        self.mover.relocate(file, &destination)
    }

    /// Sort every file in order, reporting each outcome as it happens
    pub fn sort_all<F>(&self, files: &[PathBuf], mut on_outcome: F) -> RunSummary
    where
        F: FnMut(&FileOutcome),
    {
        let mut summary = RunSummary {
            total: files.len(),
            ..RunSummary::default()
        };

        for file in files {
            let outcome = FileOutcome {
                file: file.clone(),
                result: self.sort(file),
            };

            summary.record(&outcome);
            on_outcome(&outcome);
        }

        info!(
            "{} files sorted, {} files remain",
            summary.sorted,
            summary.remaining()
        );

        summary
    }

    /// Run the tag reader, turning any failure (including a panic inside the
    /// decoder) into a per-file error
    fn read_tags(&self, file: &Path) -> SortResult<TagBundle> {
        let parse_error = |reason: String| SortError::MetadataParse {
            path: file.to_path_buf(),
            reason,
        };

        match panic::catch_unwind(AssertUnwindSafe(|| self.reader.analyze(file))) {
            Ok(Ok(bundle)) => Ok(bundle),
            Ok(Err(e)) => Err(parse_error(e.to_string())),
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "tag decoder panicked".to_string());
                Err(parse_error(reason))
            }
        }
    }
}
