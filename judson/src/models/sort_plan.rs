//! Per-file sort plan and its computed destination

use std::path::{Path, PathBuf};

/// Resolved display fields for one file
///
/// Fields hold raw tag values; sanitization happens when the destination is
/// built. Empty strings mean "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortPlan {
    pub artist: String,
    pub album: String,
    /// Optional; appended to the folder name when present
    pub catalog: String,
    pub track: String,
    pub title: String,
    /// Source file suffix after the last `.`, empty when the file has none
    pub extension: String,
}

impl SortPlan {
    /// Take the extension from the source file name
    pub fn extension_of(path: &Path) -> String {
        path.extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Sanitized folder and file name for a sorted file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPath {
    /// `"{artist} - {album}"`, optionally followed by `" ({catalog})"`
    pub folder_name: String,
    /// `"{track} - {title}.{extension}"`
    pub file_name: String,
}

impl DestinationPath {
    /// Full path of the file under `output_root`
    pub fn under(&self, output_root: &Path) -> PathBuf {
        output_root.join(&self.folder_name).join(&self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_taken_verbatim() {
        assert_eq!(SortPlan::extension_of(Path::new("/in/song.FLAC")), "FLAC");
        assert_eq!(SortPlan::extension_of(Path::new("/in/live.2001.mp3")), "mp3");
        assert_eq!(SortPlan::extension_of(Path::new("/in/no_extension")), "");
    }

    #[test]
    fn test_destination_under_root() {
        let destination = DestinationPath {
            folder_name: "Miles Davis - Kind of Blue".to_string(),
            file_name: "1 - So What.flac".to_string(),
        };

        assert_eq!(
            destination.under(Path::new("/out")),
            PathBuf::from("/out/Miles Davis - Kind of Blue/1 - So What.flac")
        );
    }
}
