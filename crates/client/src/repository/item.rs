//! Typed and stored representations of repository records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::codec::{EntityCodec, IndexKey};

/// The on-the-wire/storage record.
///
/// Indexed columns sit at the top level (flattened) so the backend can
/// filter on them without parsing the payload; `target` carries the
/// whole entity as an opaque JSON text blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRepositoryItem {
    pub id: String,
    #[serde(flatten)]
    pub index: BTreeMap<String, String>,
    /// Current item data as a JSON string
    pub target: String,
}

impl StoredRepositoryItem {
    pub fn new(id: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            index: BTreeMap::new(),
            target: target.into(),
        }
    }

    pub fn with_index_value(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.index.insert(field.into(), value.into());
        self
    }

    pub fn index_value(&self, field: &str) -> Option<&str> {
        self.index.get(field).map(String::as_str)
    }
}

/// The typed, in-memory record handed to callers.
///
/// Indexed values are recomputed from `target` at construction; callers
/// cannot supply them, so the two representations can never drift.
pub struct RepositoryItem<K: EntityCodec> {
    id: String,
    index: BTreeMap<&'static str, String>,
    target: K::Entity,
}

impl<K: EntityCodec> RepositoryItem<K> {
    pub fn new(id: impl Into<String>, target: K::Entity) -> Self {
        let index = K::Index::ALL
            .iter()
            .map(|key| (key.field_name(), K::index_value(&target, *key)))
            .collect();
        Self {
            id: id.into(),
            index,
            target,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn target(&self) -> &K::Entity {
        &self.target
    }

    pub fn into_target(self) -> K::Entity {
        self.target
    }

    /// The derived value of one indexed column.
    pub fn index_value(&self, key: K::Index) -> &str {
        self.index
            .get(key.field_name())
            .map(String::as_str)
            .unwrap_or_default()
    }
}

impl<K: EntityCodec> Clone for RepositoryItem<K> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            index: self.index.clone(),
            target: self.target.clone(),
        }
    }
}

impl<K: EntityCodec> std::fmt::Debug for RepositoryItem<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryItem")
            .field("id", &self.id)
            .field("index", &self.index)
            .field("target", &self.target)
            .finish()
    }
}

impl<K: EntityCodec> PartialEq for RepositoryItem<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.index == other.index && self.target == other.target
    }
}
