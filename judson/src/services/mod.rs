//! Sorting services
//!
//! Each service covers one step of sorting a file: discovery, tag
//! extraction, field resolution, destination naming and the move itself.

pub mod field_resolver;
pub mod file_mover;
pub mod file_scanner;
pub mod metadata_extractor;
pub mod path_builder;
pub mod sanitize;

pub use field_resolver::{FieldResolver, LookupPath};
pub use file_mover::{FileMover, MoveReport, MoveStage};
pub use file_scanner::FileScanner;
pub use metadata_extractor::{LoftyTagReader, MetadataError, TagReader};
pub use path_builder::build_destination;
pub use sanitize::sanitize;
