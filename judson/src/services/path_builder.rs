//! Destination naming
//!
//! Sorted files are saved as `"{artist} - {album}[ ({catalog})]/{track} - {title}.{ext}"`.
//! The extension comes from the source file name, never from tags: the
//! container suffix is more trustworthy than a tag-declared format.

use crate::error::{SortError, SortResult};
use crate::models::{DestinationPath, SortPlan};
use crate::services::field_resolver::Field;
use crate::services::sanitize::sanitize;
use std::path::Path;

/// Build the sanitized folder and file name for `plan`
///
/// Artist, album, track and title are required and checked in that order
/// after sanitization; the first empty one is reported. `file` only labels
/// the error.
pub fn build_destination(file: &Path, plan: &SortPlan) -> SortResult<DestinationPath> {
    let required = |field: Field, value: &str| {
        let clean = sanitize(value);
        if clean.is_empty() {
            Err(SortError::MissingField {
                path: file.to_path_buf(),
                field: field.name(),
            })
        } else {
            Ok(clean)
        }
    };

    let artist = required(Field::Artist, &plan.artist)?;
    let album = required(Field::Album, &plan.album)?;
    let track = required(Field::Track, &plan.track)?;
    let title = required(Field::Title, &plan.title)?;
    let catalog = sanitize(&plan.catalog);

    let folder_name = if catalog.is_empty() {
        format!("{} - {}", artist, album)
    } else {
        format!("{} - {} ({})", artist, album, catalog)
    };

    let file_name = if plan.extension.is_empty() {
        format!("{} - {}", track, title)
    } else {
        format!("{} - {}.{}", track, title, plan.extension)
    };

    Ok(DestinationPath {
        folder_name,
        file_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> SortPlan {
        SortPlan {
            artist: "Miles Davis".to_string(),
            album: "Kind of Blue".to_string(),
            catalog: String::new(),
            track: "1".to_string(),
            title: "So What".to_string(),
            extension: "flac".to_string(),
        }
    }

    fn missing_field(plan: &SortPlan) -> &'static str {
        match build_destination(Path::new("/in/song.flac"), plan) {
            Err(SortError::MissingField { field, .. }) => field,
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_basic_layout() {
        let destination = build_destination(Path::new("/in/song.flac"), &plan()).unwrap();
        assert_eq!(destination.folder_name, "Miles Davis - Kind of Blue");
        assert_eq!(destination.file_name, "1 - So What.flac");
    }

    #[test]
    fn test_catalog_appended_when_present() {
        let plan = SortPlan {
            catalog: "CL 1355".to_string(),
            ..plan()
        };
        let destination = build_destination(Path::new("/in/song.flac"), &plan).unwrap();
        assert_eq!(destination.folder_name, "Miles Davis - Kind of Blue (CL 1355)");
    }

    #[test]
    fn test_blank_catalog_is_omitted() {
        let plan = SortPlan {
            catalog: " / ".to_string(),
            ..plan()
        };
        let destination = build_destination(Path::new("/in/song.flac"), &plan).unwrap();
        assert_eq!(destination.folder_name, "Miles Davis - Kind of Blue");
    }

    #[test]
    fn test_components_are_sanitized() {
        let plan = SortPlan {
            artist: "AC/DC".to_string(),
            album: r"Back \ In Black".to_string(),
            title: "Hells Bells / Live".to_string(),
            ..plan()
        };
        let destination = build_destination(Path::new("/in/song.flac"), &plan).unwrap();
        assert_eq!(destination.folder_name, "ACDC - Back In Black");
        assert_eq!(destination.file_name, "1 - Hells Bells Live.flac");
        assert!(!destination.folder_name.contains('/'));
        assert!(!destination.file_name.contains('/'));
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        let empty = SortPlan {
            extension: "mp3".to_string(),
            ..SortPlan::default()
        };
        assert_eq!(missing_field(&empty), "artist");

        let no_album = SortPlan {
            album: String::new(),
            track: String::new(),
            ..plan()
        };
        assert_eq!(missing_field(&no_album), "album");

        let no_track = SortPlan {
            track: String::new(),
            title: String::new(),
            ..plan()
        };
        assert_eq!(missing_field(&no_track), "track");

        let no_title = SortPlan {
            title: String::new(),
            ..plan()
        };
        assert_eq!(missing_field(&no_title), "title");
    }

    #[test]
    fn test_field_empty_after_sanitization_is_missing() {
        let plan = SortPlan {
            title: " // ".to_string(),
            ..plan()
        };
        assert_eq!(missing_field(&plan), "title");
    }

    #[test]
    fn test_no_extension() {
        let plan = SortPlan {
            extension: String::new(),
            ..plan()
        };
        let destination = build_destination(Path::new("/in/song"), &plan).unwrap();
        assert_eq!(destination.file_name, "1 - So What");
    }
}
