//! judson library interface
//!
//! Sorts audio files into `Artist - Album/Track - Title.ext` folders using
//! their embedded tags. Exposes the engine and its services for the binary
//! and for integration testing.

pub mod error;
pub mod librarian;
pub mod models;
pub mod services;

pub use crate::error::{SortError, SortResult};
pub use crate::librarian::{FileOutcome, Librarian, RunSummary, SortSettings};
pub use crate::models::tag_bundle::{TagBundle, TagNode};
pub use crate::services::metadata_extractor::{LoftyTagReader, MetadataError, TagReader};
