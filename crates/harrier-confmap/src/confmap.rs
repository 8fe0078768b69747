//! Ordered configuration value trees.
//!
//! A [`Confmap`] wraps a YAML mapping and preserves document order across
//! lookups and merges. Merging is right-biased: the incoming tree wins on
//! conflicting keys, and untouched keys keep their original positions.

use serde_yaml::mapping::Entry;
use serde_yaml::{Mapping, Value};

use crate::error::{ConfmapError, Result};

/// Separator for nested key lookups (`service.pipelines.traces`).
pub const KEY_SEPARATOR: char = '.';

/// An ordered tree of configuration values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Confmap {
    root: Mapping,
}

impl Confmap {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a parsed YAML value.
    ///
    /// `null` (an empty document) yields an empty tree; any other
    /// non-mapping root is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Mapping(root) => Ok(Self { root }),
            _ => Err(ConfmapError::NotAMapping),
        }
    }

    /// Parse a YAML document into a tree.
    pub fn parse_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        Self::from_value(serde_yaml::from_str(text)?)
    }

    /// Look up a value by dotted key path.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split(KEY_SEPARATOR);
        let first = segments.next()?;
        let mut current = self.root.get(&Value::String(first.to_string()))?;
        for segment in segments {
            current = current
                .as_mapping()?
                .get(&Value::String(segment.to_string()))?;
        }
        Some(current)
    }

    /// Whether a dotted key path is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set a top-level key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.root.insert(Value::String(key.into()), value);
    }

    /// Merge another tree on top of this one.
    ///
    /// Nested mappings merge recursively; everything else is overwritten by
    /// the incoming value. Existing keys keep their positions, new keys are
    /// appended in the incoming order.
    pub fn merge(&mut self, other: Confmap) {
        merge_mapping(&mut self.root, other.root);
    }

    /// Iterate top-level entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.root.iter()
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Whether the tree has no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Borrow the underlying mapping.
    pub fn as_mapping(&self) -> &Mapping {
        &self.root
    }

    /// Consume the tree into a YAML value.
    pub fn into_value(self) -> Value {
        Value::Mapping(self.root)
    }
}

fn merge_mapping(dst: &mut Mapping, src: Mapping) {
    for (key, incoming) in src {
        match dst.entry(key) {
            Entry::Occupied(mut slot) => match (slot.get_mut(), incoming) {
                (Value::Mapping(existing), Value::Mapping(nested)) => {
                    merge_mapping(existing, nested);
                }
                (existing, incoming) => *existing = incoming,
            },
            Entry::Vacant(slot) => {
                slot.insert(incoming);
            }
        }
    }
}
