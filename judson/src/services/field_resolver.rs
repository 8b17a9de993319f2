//! Tag field resolution and the fingerprint gate
//!
//! Each display field has a fixed list of candidate tag keys. Combined with
//! the configured namespace priority this gives a flat, ordered list of
//! [`LookupPath`]s; the first path holding a value wins.
//!
//! Before any field is resolved, the bundle must carry the fingerprint tag
//! (an AcoustID written by the tagging pipeline). Files without it are not
//! trusted, even if every display field is present.

use crate::error::{SortError, SortResult};
use crate::models::{SortPlan, TagBundle, TagNode};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Display fields used to build a destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Artist,
    Album,
    Catalog,
    Track,
    Title,
}

impl Field {
    /// Candidate tag keys, in lookup order
    pub fn candidate_keys(self) -> &'static [&'static str] {
        match self {
            Field::Artist => &["albumartist", "band", "artist"],
            Field::Album => &["album"],
            Field::Catalog => &["catalognumber"],
            Field::Track => &["track_number"],
            Field::Title => &["title"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Artist => "artist",
            Field::Album => "album",
            Field::Catalog => "catalog",
            Field::Track => "track",
            Field::Title => "title",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One `(namespace, key)` location in a [`TagBundle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupPath {
    pub namespace: String,
    pub key: String,
}

impl LookupPath {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for LookupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.key)
    }
}

/// First value of the first candidate key with a non-empty value list
pub fn resolve(candidate_keys: &[&str], comments: &BTreeMap<String, TagNode>) -> SortResult<String> {
    candidate_keys
        .iter()
        .find_map(|key| match comments.get(*key) {
            Some(TagNode::Values(values)) => values.first().cloned(),
            _ => None,
        })
        .ok_or_else(|| SortError::FieldNotFound {
            field: candidate_keys.join("/"),
        })
}

/// First value found along `paths`, in order
pub fn resolve_paths(paths: &[LookupPath], bundle: &TagBundle) -> SortResult<String> {
    paths
        .iter()
        .find_map(|path| {
            bundle
                .values(&path.namespace, &path.key)
                .and_then(|values| values.first().cloned())
        })
        .ok_or_else(|| SortError::FieldNotFound {
            field: paths
                .iter()
                .map(|path| path.key.as_str())
                .fold(Vec::<&str>::new(), |mut keys, key| {
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                    keys
                })
                .join("/"),
        })
}

/// Resolves display fields from a [`TagBundle`]
#[derive(Debug, Clone)]
pub struct FieldResolver {
    namespaces: Vec<String>,
    fingerprint_tag: String,
}

impl FieldResolver {
    /// Create a resolver
    ///
    /// `namespaces` is the namespace priority order; `fingerprint_tag` the
    /// key fragment that must appear somewhere in a bundle.
    pub fn new(namespaces: Vec<String>, fingerprint_tag: impl Into<String>) -> Self {
        Self {
            namespaces: namespaces.into_iter().map(|ns| ns.to_lowercase()).collect(),
            fingerprint_tag: fingerprint_tag.into(),
        }
    }

    /// Lookup paths for `field`, key-major: every namespace is tried for the
    /// first candidate key before moving to the next key
    pub fn lookup_paths(&self, field: Field) -> Vec<LookupPath> {
        field
            .candidate_keys()
            .iter()
            .flat_map(|key| {
                self.namespaces
                    .iter()
                    .map(move |namespace| LookupPath::new(namespace.as_str(), *key))
            })
            .collect()
    }

    pub fn resolve(&self, field: Field, bundle: &TagBundle) -> SortResult<String> {
        resolve_paths(&self.lookup_paths(field), bundle)
    }

    /// Reject bundles without the fingerprint tag
    pub fn check_primary_tag(&self, file: &Path, bundle: &TagBundle) -> SortResult<()> {
        if bundle.contains_key_fragment(&self.fingerprint_tag) {
            Ok(())
        } else {
            Err(SortError::PrimaryTagMissing {
                path: file.to_path_buf(),
                tag: self.fingerprint_tag.clone(),
            })
        }
    }

    /// Gate the bundle, then resolve every display field
    ///
    /// Missing fields are left empty; the path builder decides which of them
    /// are required.
    pub fn plan(&self, file: &Path, bundle: &TagBundle) -> SortResult<SortPlan> {
        self.check_primary_tag(file, bundle)?;

        let resolve_or_empty = |field: Field| match self.resolve(field, bundle) {
            Ok(value) => value,
            Err(e) => {
                debug!(file = %file.display(), field = %field, "{}", e);
                String::new()
            }
        };

        Ok(SortPlan {
            artist: resolve_or_empty(Field::Artist),
            album: resolve_or_empty(Field::Album),
            catalog: resolve_or_empty(Field::Catalog),
            track: resolve_or_empty(Field::Track),
            title: resolve_or_empty(Field::Title),
            extension: SortPlan::extension_of(file),
        })
    }
}
