//! Entity codec - the single authority reconciling typed items and
//! stored records.
//!
//! `target` is the source of truth in both directions: decoding parses
//! it and recomputes every indexed column from the parsed entity, and
//! encoding recomputes them the same way, never trusting values a
//! caller or the backend carried alongside.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::RepositoryError;
use super::item::{RepositoryItem, StoredRepositoryItem};

/// A typed accessor for an entity's indexed columns.
///
/// Using an enum per entity type makes equality lookups over
/// non-indexed fields unrepresentable.
pub trait IndexKey: Copy + Eq + Send + Sync + 'static {
    /// Every key of this index type, in stable order.
    const ALL: &'static [Self];

    /// Wire name of the indexed column.
    fn field_name(self) -> &'static str;
}

/// Index for entity types with no secondary lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoIndex {}

impl IndexKey for NoIndex {
    const ALL: &'static [Self] = &[];

    fn field_name(self) -> &'static str {
        match self {}
    }
}

/// Per-entity-type codec configuration.
pub trait EntityCodec: Send + Sync + 'static {
    type Entity: Clone
        + std::fmt::Debug
        + PartialEq
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;
    type Index: IndexKey;

    /// Entity type name used in error context.
    const ENTITY_TYPE: &'static str;

    /// Derive one indexed column value from the entity.
    fn index_value(entity: &Self::Entity, key: Self::Index) -> String;
}

/// Parse a stored record into a typed item.
///
/// Shape validation is exact: a `target` payload with missing,
/// wrong-typed, or unexpected extra fields rejects with a
/// [`RepositoryError::Decode`] tagged with the record's id. A corrupt
/// record is never silently coerced or skipped.
pub fn decode<K: EntityCodec>(
    stored: &StoredRepositoryItem,
) -> Result<RepositoryItem<K>, RepositoryError> {
    if stored.id.is_empty() {
        return Err(RepositoryError::decode(
            K::ENTITY_TYPE,
            &stored.id,
            "record id is empty",
        ));
    }
    let entity: K::Entity = serde_json::from_str(&stored.target)
        .map_err(|e| RepositoryError::decode(K::ENTITY_TYPE, &stored.id, e))?;
    Ok(RepositoryItem::new(stored.id.clone(), entity))
}

/// Serialize a typed item into its stored record, recomputing every
/// indexed column straight from `target`.
pub fn encode<K: EntityCodec>(
    item: &RepositoryItem<K>,
) -> Result<StoredRepositoryItem, RepositoryError> {
    if item.id().is_empty() {
        return Err(RepositoryError::decode(
            K::ENTITY_TYPE,
            item.id(),
            "item id is empty",
        ));
    }
    let target = serde_json::to_string(item.target())
        .map_err(|e| RepositoryError::decode(K::ENTITY_TYPE, item.id(), e))?;
    let mut stored = StoredRepositoryItem::new(item.id(), target);
    for key in K::Index::ALL {
        stored
            .index
            .insert(key.field_name().to_string(), K::index_value(item.target(), *key));
    }
    Ok(stored)
}
