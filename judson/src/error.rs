//! Error types for judson
//!
//! Root-level errors (`Directory`, `Create`, `Permission` on the source or
//! output folder) are fatal to a run. Everything else is scoped to a single
//! file: the librarian logs it and moves on.

use std::path::PathBuf;
use thiserror::Error;

/// Sorting error type
#[derive(Debug, Error)]
pub enum SortError {
    /// Traversal root cannot be opened or read
    #[error("Could not open '{path}': {reason}")]
    Directory { path: PathBuf, reason: String },

    /// Directory creation failed
    #[error("Cannot create {path}, please check permissions: {reason}")]
    Create { path: PathBuf, reason: String },

    /// Directory is not readable or writable
    #[error("Cannot {access} {path}, please check permissions")]
    Permission { path: PathBuf, access: &'static str },

    /// Metadata adapter could not read the file
    #[error("Could not read tags from '{path}': {reason}")]
    MetadataParse { path: PathBuf, reason: String },

    /// Fingerprint tag absent; remaining tags are not trusted
    #[error("Missing information tags, could not identify {tag} for '{path}'")]
    PrimaryTagMissing { path: PathBuf, tag: String },

    /// No candidate key carried a value
    #[error("Could not identify {field}")]
    FieldNotFound { field: String },

    /// Required display field empty after sanitization
    #[error("Missing {field} for '{path}'")]
    MissingField { path: PathBuf, field: &'static str },

    /// Destination already exists
    #[error("{destination} already exists and would be overwritten")]
    Collision { destination: PathBuf },

    /// Copy to destination failed; source untouched
    #[error("cp {file} failed: {reason}")]
    Copy {
        file: PathBuf,
        destination: PathBuf,
        reason: String,
    },

    /// Copy succeeded but the source could not be removed
    #[error("cannot remove {file}, please cleanup manually: {reason}")]
    SourceCleanup { file: PathBuf, reason: String },
}

/// Result type for sorting operations
pub type SortResult<T> = Result<T, SortError>;
