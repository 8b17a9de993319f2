//! Data models shared across services

pub mod sort_plan;
pub mod tag_bundle;

pub use sort_plan::{DestinationPath, SortPlan};
pub use tag_bundle::{TagBundle, TagNode};
