//! In-memory tag reader keyed by file name

use judson::{MetadataError, TagBundle, TagReader};
use std::collections::HashMap;
use std::path::Path;

/// Returns canned bundles by file name; unknown files fail to parse
#[derive(Default)]
pub struct FakeTagReader {
    bundles: HashMap<String, TagBundle>,
}

impl FakeTagReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, file_name: &str, bundle: TagBundle) -> Self {
        self.bundles.insert(file_name.to_string(), bundle);
        self
    }
}

impl TagReader for FakeTagReader {
    fn analyze(&self, path: &Path) -> Result<TagBundle, MetadataError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.bundles
            .get(&name)
            .cloned()
            .ok_or_else(|| MetadataError::ReadError(format!("no tags for {}", name)))
    }
}

/// ID3v2 bundle with the AcoustID tag and the four display fields
pub fn fingerprinted(artist: &str, album: &str, track: &str, title: &str) -> TagBundle {
    TagBundle::new()
        .with("id3v2", "acoustid id", "e1f6c4a2-0000-4000-8000-000000000000")
        .with("id3v2", "artist", artist)
        .with("id3v2", "album", album)
        .with("id3v2", "track_number", track)
        .with("id3v2", "title", title)
}
