//! Port traits the repository service depends on.
//!
//! All three collaborators live behind object-safe traits so SQL,
//! document-store, or in-memory backends can satisfy the same
//! contract.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::RepositoryError;
use super::item::StoredRepositoryItem;

/// The storage-facing contract bound to a live backend connection.
///
/// Equality filtering over indexed columns is the only secondary
/// access pattern; there are no range queries or compound predicates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Repository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<StoredRepositoryItem>, RepositoryError>;

    /// Fetch the records matching `ids`; missing ids are omitted.
    async fn get_some(&self, ids: Vec<String>) -> Result<Vec<StoredRepositoryItem>, RepositoryError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredRepositoryItem>, RepositoryError>;

    /// All records whose indexed column `field` equals `value`.
    async fn get_all_by_property(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Vec<StoredRepositoryItem>, RepositoryError>;

    /// Upsert by id and return the record as persisted.
    async fn update_or_create(
        &self,
        item: StoredRepositoryItem,
    ) -> Result<StoredRepositoryItem, RepositoryError>;

    /// Delete every listed record; already-absent records are not an
    /// error.
    async fn delete_by_list(&self, items: Vec<StoredRepositoryItem>)
        -> Result<(), RepositoryError>;
}

/// Strategy binding a live connection to a concrete repository
/// implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryInitializer<C: Send + Sync + 'static>: Send + Sync {
    /// May itself suspend, e.g. to create backend-side collections.
    async fn initialize_repository(
        &self,
        client: C,
    ) -> Result<Arc<dyn Repository>, RepositoryError>;
}

/// Lazily-established backend connection shared by sibling repository
/// services. Owned and torn down by whoever constructed it, never by
/// this layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SharedClientHandle<C: Clone + Send + Sync + 'static>: Send + Sync {
    /// Suspends until the connection is established.
    async fn wait_for_initialization(&self);

    /// The live connection, or `None` when not connected.
    fn get_client(&self) -> Option<C>;
}
