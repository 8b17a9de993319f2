//! Normalized tag data extracted from one audio file
//!
//! A [`TagBundle`] is a tree: the root maps tag namespaces (`id3v2`,
//! `vorbiscomments`, ...) to field maps, and each field map maps a lowercase
//! field name to its ordered values. Nodes are either a nested map or a leaf
//! list of strings.

use std::collections::BTreeMap;

/// One node in a tag tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagNode {
    /// Leaf: ordered values for one field
    Values(Vec<String>),
    /// Nested mapping
    Map(BTreeMap<String, TagNode>),
}

impl TagNode {
    /// True if this node, or anything below it, holds a non-blank value
    pub fn has_value(&self) -> bool {
        match self {
            TagNode::Values(values) => values.iter().any(|v| !v.trim().is_empty()),
            TagNode::Map(children) => children.values().any(TagNode::has_value),
        }
    }

    /// Depth-first search for a key containing `fragment` whose node carries
    /// a value
    ///
    /// Case-insensitive; `_` and `-` in keys and fragment compare as spaces.
    pub fn contains_key_fragment(&self, fragment: &str) -> bool {
        match self {
            TagNode::Map(children) => map_contains_fragment(children, &fold_key(fragment)),
            TagNode::Values(_) => false,
        }
    }
}

/// Lowercase, with word separators folded to a space
fn fold_key(key: &str) -> String {
    key.to_lowercase().replace(['_', '-'], " ")
}

fn map_contains_fragment(map: &BTreeMap<String, TagNode>, fragment: &str) -> bool {
    map.iter().any(|(key, node)| {
        (fold_key(key).contains(fragment) && node.has_value())
            || matches!(node, TagNode::Map(children) if map_contains_fragment(children, fragment))
    })
}

/// Tags for one file, grouped by namespace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagBundle {
    namespaces: BTreeMap<String, TagNode>,
}

impl TagBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `namespace` / `field`
    ///
    /// Field names are stored lowercase. Blank values are dropped so that a
    /// present field always has at least one usable value.
    pub fn push(&mut self, namespace: &str, field: &str, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            return;
        }

        let fields = self
            .namespaces
            .entry(namespace.to_lowercase())
            .or_insert_with(|| TagNode::Map(BTreeMap::new()));
        let TagNode::Map(fields) = fields else {
            return;
        };

        if let TagNode::Values(values) = fields
            .entry(field.to_lowercase())
            .or_insert_with(|| TagNode::Values(Vec::new()))
        {
            values.push(value);
        }
    }

    /// Builder-style [`push`](Self::push)
    pub fn with(mut self, namespace: &str, field: &str, value: impl Into<String>) -> Self {
        self.push(namespace, field, value);
        self
    }

    /// Insert a raw node, replacing whatever was stored under `key`
    pub fn insert_node(&mut self, key: &str, node: TagNode) {
        self.namespaces.insert(key.to_lowercase(), node);
    }

    /// Field map for one namespace
    pub fn namespace(&self, namespace: &str) -> Option<&BTreeMap<String, TagNode>> {
        match self.namespaces.get(namespace)? {
            TagNode::Map(fields) => Some(fields),
            TagNode::Values(_) => None,
        }
    }

    /// Namespaces present in this bundle
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    /// Values stored at `namespace` / `field`
    pub fn values(&self, namespace: &str, field: &str) -> Option<&[String]> {
        match self.namespace(namespace)?.get(field)? {
            TagNode::Values(values) => Some(values),
            TagNode::Map(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// See [`TagNode::contains_key_fragment`]
    pub fn contains_key_fragment(&self, fragment: &str) -> bool {
        map_contains_fragment(&self.namespaces, &fold_key(fragment))
    }
}
