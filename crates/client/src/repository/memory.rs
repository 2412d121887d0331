//! In-memory repository implementation for development and testing.
//!
//! Records live in a `RwLock`-guarded map keyed by id; nothing
//! persists. Suitable for tests and local development only.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::RepositoryError;
use super::item::StoredRepositoryItem;
use super::ports::{Repository, RepositoryInitializer};

/// In-memory storage backend for one entity collection.
pub struct InMemoryRepository {
    items: RwLock<BTreeMap<String, StoredRepositoryItem>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get_all(&self) -> Result<Vec<StoredRepositoryItem>, RepositoryError> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn get_some(
        &self,
        ids: Vec<String>,
    ) -> Result<Vec<StoredRepositoryItem>, RepositoryError> {
        let items = self.items.read().await;
        Ok(ids.iter().filter_map(|id| items.get(id).cloned()).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredRepositoryItem>, RepositoryError> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn get_all_by_property(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Vec<StoredRepositoryItem>, RepositoryError> {
        Ok(self
            .items
            .read()
            .await
            .values()
            .filter(|item| item.index_value(field) == Some(value))
            .cloned()
            .collect())
    }

    async fn update_or_create(
        &self,
        item: StoredRepositoryItem,
    ) -> Result<StoredRepositoryItem, RepositoryError> {
        let mut items = self.items.write().await;
        items.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn delete_by_list(
        &self,
        to_delete: Vec<StoredRepositoryItem>,
    ) -> Result<(), RepositoryError> {
        let mut items = self.items.write().await;
        for item in &to_delete {
            // Absent ids are fine; delete is idempotent.
            items.remove(&item.id);
        }
        Ok(())
    }
}

/// Initializer handing out a pre-built in-memory repository regardless
/// of the connection value.
pub struct InMemoryRepositoryInitializer {
    repository: Arc<InMemoryRepository>,
}

impl InMemoryRepositoryInitializer {
    pub fn new(repository: Arc<InMemoryRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<C: Send + Sync + 'static> RepositoryInitializer<C> for InMemoryRepositoryInitializer {
    async fn initialize_repository(
        &self,
        _client: C,
    ) -> Result<Arc<dyn Repository>, RepositoryError> {
        Ok(Arc::clone(&self.repository) as Arc<dyn Repository>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, tag: &str) -> StoredRepositoryItem {
        StoredRepositoryItem::new(id, "{}").with_index_value("tag", tag)
    }

    #[tokio::test]
    async fn upsert_replaces_by_id() {
        let repository = InMemoryRepository::new();
        repository.update_or_create(record("a", "x")).await.unwrap();
        repository.update_or_create(record("a", "y")).await.unwrap();

        assert_eq!(repository.len().await, 1);
        let found = repository.find_by_id("a").await.unwrap().unwrap();
        assert_eq!(found.index_value("tag"), Some("y"));
    }

    #[tokio::test]
    async fn get_some_omits_missing_ids() {
        let repository = InMemoryRepository::new();
        repository.update_or_create(record("a", "x")).await.unwrap();

        let found = repository
            .get_some(vec!["a".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "a");
    }

    #[tokio::test]
    async fn property_filter_matches_on_equality_only() {
        let repository = InMemoryRepository::new();
        repository.update_or_create(record("a", "x")).await.unwrap();
        repository.update_or_create(record("b", "y")).await.unwrap();

        let matching = repository.get_all_by_property("tag", "x").await.unwrap();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].id, "a");
        assert!(repository
            .get_all_by_property("tag", "z")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let repository = InMemoryRepository::new();
        repository.update_or_create(record("a", "x")).await.unwrap();

        let batch = vec![record("a", "x")];
        repository.delete_by_list(batch.clone()).await.unwrap();
        repository.delete_by_list(batch).await.unwrap();
        assert!(repository.is_empty().await);
    }
}
