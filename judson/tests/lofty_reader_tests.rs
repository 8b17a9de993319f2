//! Tag reader tests against real files
//!
//! WAV fixtures are generated with hound. Untagged ones must parse and be
//! turned away by the fingerprint gate; ones carrying an ID3v2 chunk with an
//! AcoustID user text frame must be sorted.

use hound::{SampleFormat, WavSpec, WavWriter};
use judson::{Librarian, LoftyTagReader, SortError, SortSettings, TagReader};
use lofty::config::WriteOptions;
use lofty::id3::v2::Id3v2Tag;
use lofty::tag::{Accessor, TagExt};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write a short 440Hz mono tone
fn generate_test_wav(path: &Path) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).unwrap();
    for i in 0..800 {
        let t = i as f32 / spec.sample_rate as f32;
        let sample = (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.3;
        writer.write_sample((sample * i16::MAX as f32) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

/// Attach an ID3v2 chunk the way a fingerprinting tagger would
fn tag_wav(path: &Path, artist: &str, album: &str, track: u32, title: &str) {
    let mut tag = Id3v2Tag::new();
    tag.set_artist(artist.to_string());
    tag.set_album(album.to_string());
    tag.set_track(track);
    tag.set_title(title.to_string());
    let _ = tag.insert_user_text(
        "Acoustid Id".to_string(),
        "8f0c2a5e-1b7d-4c3e-9a4f-6d2b1e0c7a93".to_string(),
    );
    tag.save_to_path(path, WriteOptions::default()).unwrap();
}

#[test]
fn test_tagged_wav_is_read_into_id3v2_namespace() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("so_what.wav");
    generate_test_wav(&path);
    tag_wav(&path, "Miles Davis", "Kind of Blue", 1, "So What");

    let bundle = LoftyTagReader::new().analyze(&path).unwrap();
    assert_eq!(bundle.values("id3v2", "artist").unwrap(), ["Miles Davis"]);
    assert_eq!(bundle.values("id3v2", "track_number").unwrap(), ["1"]);
    assert!(bundle.values("id3v2", "acoustid id").is_some());
}

#[test]
fn test_tagged_wav_is_sorted() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input");
    fs::create_dir_all(&input).unwrap();
    let path = input.join("so_what.wav");
    generate_test_wav(&path);
    tag_wav(&path, "Miles Davis", "Kind of Blue", 1, "So What");
    let original = fs::read(&path).unwrap();

    let output = temp_dir.path().join("output");
    let librarian = Librarian::new(&input, &output, LoftyTagReader::new(), SortSettings::default()).unwrap();

    let report = librarian.sort(&path).unwrap();

    let expected = output
        .canonicalize()
        .unwrap()
        .join("Miles Davis - Kind of Blue/1 - So What.wav");
    assert_eq!(report.destination, expected);
    assert!(report.source_removed());
    assert_eq!(fs::read(&expected).unwrap(), original);
    assert!(!path.exists());
}

#[test]
fn test_untagged_wav_parses_to_empty_bundle() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tone.wav");
    generate_test_wav(&path);

    let bundle = LoftyTagReader::new().analyze(&path).unwrap();
    assert!(bundle.is_empty());
}

#[test]
fn test_untagged_wav_is_not_sorted() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input");
    std::fs::create_dir_all(&input).unwrap();
    let path = input.join("tone.wav");
    generate_test_wav(&path);

    let librarian = Librarian::new(
        &input,
        &temp_dir.path().join("output"),
        LoftyTagReader::new(),
        SortSettings::default(),
    )
    .unwrap();

    let result = librarian.sort(&path);
    assert!(matches!(result, Err(SortError::PrimaryTagMissing { .. })));
    assert!(path.exists());
}

#[test]
fn test_text_file_is_a_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input");
    std::fs::create_dir_all(&input).unwrap();
    let path = input.join("readme.txt");
    std::fs::write(&path, "not audio").unwrap();

    let librarian = Librarian::new(
        &input,
        &temp_dir.path().join("output"),
        LoftyTagReader::new(),
        SortSettings::default(),
    )
    .unwrap();

    let result = librarian.sort(&path);
    assert!(matches!(result, Err(SortError::MetadataParse { .. })));
    assert!(path.exists());
}
