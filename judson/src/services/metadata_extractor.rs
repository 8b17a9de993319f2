//! Audio tag extraction
//!
//! [`TagReader`] is the boundary to whatever decodes tags. The engine only
//! sees the normalized [`TagBundle`] it returns. [`LoftyTagReader`] is the
//! production implementation, supporting ID3v1, ID3v2, Vorbis comments, APE,
//! MP4 ilst, RIFF INFO and AIFF text chunks.
//!
//! Field names are normalized so that the same logical field has the same
//! key in every namespace (`artist`, `albumartist`, `album`, `title`,
//! `track_number`, `catalognumber`). Free-form keys (ID3v2 `TXXX`, MP4
//! `----` atoms) keep their description, lowercased.

use crate::models::TagBundle;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag, TagType};
use std::path::Path;
use thiserror::Error;

/// Metadata extraction errors
#[derive(Debug, Error)]
pub enum MetadataError {
    /// File could not be probed or its tags could not be parsed
    #[error("Failed to read file: {0}")]
    ReadError(String),

    /// I/O error (file read)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Reads the tags of one audio file
pub trait TagReader {
    /// Extract every tag of `path` into a fresh bundle
    fn analyze(&self, path: &Path) -> Result<TagBundle, MetadataError>;
}

/// Tag reader backed by lofty
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagReader;

impl LoftyTagReader {
    /// Create new tag reader
    pub fn new() -> Self {
        Self
    }
}

impl TagReader for LoftyTagReader {
    fn analyze(&self, path: &Path) -> Result<TagBundle, MetadataError> {
        let tagged_file = Probe::open(path)
            .map_err(|e| MetadataError::IoError(std::io::Error::other(e)))?
            .read()
            .map_err(|e| MetadataError::ReadError(e.to_string()))?;

        let mut bundle = TagBundle::new();
        for tag in tagged_file.tags() {
            collect_tag(&mut bundle, tag);
        }

        tracing::debug!(
            file = %path.display(),
            namespaces = ?bundle.namespaces().collect::<Vec<_>>(),
            "Extracted tags"
        );

        Ok(bundle)
    }
}

fn collect_tag(bundle: &mut TagBundle, tag: &Tag) {
    let namespace = namespace_name(tag.tag_type());
    for item in tag.items() {
        let Some(text) = item.value().text() else {
            continue;
        };

        let field = field_name(item.key());
        let value = if field == "track_number" {
            // "3/12" style values carry the total as well
            text.split('/').next().unwrap_or(text).trim()
        } else {
            text
        };

        bundle.push(&namespace, &field, value);
    }
}

/// Namespace identifier for a tag format
pub fn namespace_name(tag_type: TagType) -> String {
    match tag_type {
        TagType::Id3v2 => "id3v2".to_string(),
        TagType::Id3v1 => "id3v1".to_string(),
        TagType::VorbisComments => "vorbiscomments".to_string(),
        TagType::Ape => "ape".to_string(),
        TagType::Mp4Ilst => "mp4".to_string(),
        TagType::RiffInfo => "riffinfo".to_string(),
        TagType::AiffText => "aifftext".to_string(),
        #[allow(unreachable_patterns)]
        other => format!("{:?}", other).to_lowercase(),
    }
}

/// Canonical lowercase field name for a tag item key
pub fn field_name(key: &ItemKey) -> String {
    match key {
        ItemKey::TrackArtist => "artist".to_string(),
        ItemKey::AlbumArtist => "albumartist".to_string(),
        ItemKey::AlbumTitle => "album".to_string(),
        ItemKey::TrackTitle => "title".to_string(),
        ItemKey::TrackNumber => "track_number".to_string(),
        ItemKey::CatalogNumber => "catalognumber".to_string(),
        // "TXXX:Acoustid Id", "----:com.apple.iTunes:Acoustid Id", "ACOUSTID_ID"
        ItemKey::Unknown(raw) => raw.rsplit(':').next().unwrap_or(raw).trim().to_lowercase(),
        other => format!("{:?}", other).to_lowercase(),
    }
}
