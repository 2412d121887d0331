//! Generic repository service - the orchestrator behind every entity
//! collection.
//!
//! The service owns exactly one mutable field: the lazily-bound
//! repository handle, assigned once during `initialize`. Every
//! operation independently awaits the shared client's readiness before
//! touching the handle, which is how callers are insulated from
//! connection startup latency.

use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use super::codec::{self, EntityCodec, IndexKey};
use super::error::RepositoryError;
use super::item::RepositoryItem;
use super::observer::{RepositoryServiceEvent, ServiceObserver, Subscription};
use super::ports::{Repository, RepositoryInitializer, SharedClientHandle};

/// Service lifecycle. `initialize` is the only place a repository
/// handle is bound; `Destroyed` is terminal.
enum ServiceState {
    Uninitialized,
    Initializing,
    Ready(Arc<dyn Repository>),
    Destroyed,
}

/// Storage-agnostic repository service for one entity collection.
pub struct RepositoryService<C, K>
where
    C: Clone + Send + Sync + 'static,
    K: EntityCodec,
{
    shared_client: Arc<dyn SharedClientHandle<C>>,
    initializer: Arc<dyn RepositoryInitializer<C>>,
    state: watch::Sender<ServiceState>,
    observer: ServiceObserver,
    _codec: PhantomData<fn() -> K>,
}

impl<C, K> RepositoryService<C, K>
where
    C: Clone + Send + Sync + 'static,
    K: EntityCodec,
{
    pub fn new(
        shared_client: Arc<dyn SharedClientHandle<C>>,
        initializer: Arc<dyn RepositoryInitializer<C>>,
    ) -> Self {
        Self {
            shared_client,
            initializer,
            state: watch::Sender::new(ServiceState::Uninitialized),
            observer: ServiceObserver::new(),
            _codec: PhantomData,
        }
    }

    /// Register a callback for lifecycle events.
    pub fn on(
        &self,
        event: RepositoryServiceEvent,
        callback: impl Fn(RepositoryServiceEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.observer.subscribe(event, callback)
    }

    /// Tear down the event bus. The shared client is owned externally
    /// and is left untouched.
    pub fn destroy(&self) {
        self.observer.teardown();
        self.state.send_replace(ServiceState::Destroyed);
    }

    /// Await the shared client, bind a repository through the
    /// initializer, and publish `Initialized`.
    ///
    /// Operations that arrive while this is in flight suspend until the
    /// handle is bound rather than fail. Not guarded against concurrent
    /// re-entry; a single initializing caller is assumed.
    pub async fn initialize(&self) -> Result<(), RepositoryError> {
        if matches!(&*self.state.borrow(), ServiceState::Destroyed) {
            return Err(RepositoryError::not_initialized(K::ENTITY_TYPE));
        }
        debug!(entity = K::ENTITY_TYPE, "repository initialization started");
        self.state.send_replace(ServiceState::Initializing);
        match self.bind_repository().await {
            Ok(repository) => {
                self.state.send_replace(ServiceState::Ready(repository));
                debug!(entity = K::ENTITY_TYPE, "repository initialization finished");
                if self
                    .observer
                    .has_subscribers(RepositoryServiceEvent::Initialized)
                {
                    self.observer.publish(RepositoryServiceEvent::Initialized);
                }
                Ok(())
            }
            Err(e) => {
                // Revert so waiting operations fail fast instead of
                // suspending on an initialization that will never land.
                self.state.send_replace(ServiceState::Uninitialized);
                Err(e)
            }
        }
    }

    pub async fn get_all(&self) -> Result<Vec<RepositoryItem<K>>, RepositoryError> {
        let repository = self.repository().await?;
        let stored = repository.get_all().await?;
        stored.iter().map(codec::decode::<K>).collect()
    }

    /// Fetch the items matching `ids`; ids with no record are silently
    /// omitted.
    pub async fn get_some(&self, ids: Vec<String>) -> Result<Vec<RepositoryItem<K>>, RepositoryError> {
        let repository = self.repository().await?;
        let stored = repository.get_some(ids).await?;
        stored.iter().map(codec::decode::<K>).collect()
    }

    /// Absence is a value, not an error.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<RepositoryItem<K>>, RepositoryError> {
        let repository = self.repository().await?;
        match repository.find_by_id(id).await? {
            Some(stored) => Ok(Some(codec::decode::<K>(&stored)?)),
            None => Ok(None),
        }
    }

    /// Equality lookup over one of the entity's indexed columns.
    pub async fn get_all_by_property(
        &self,
        key: K::Index,
        value: &str,
    ) -> Result<Vec<RepositoryItem<K>>, RepositoryError> {
        let repository = self.repository().await?;
        let stored = repository
            .get_all_by_property(key.field_name(), value)
            .await?;
        stored.iter().map(codec::decode::<K>).collect()
    }

    /// Upsert by id. The returned item is re-decoded from the write
    /// result, so it reflects exactly what is now persisted.
    pub async fn save(&self, item: &RepositoryItem<K>) -> Result<RepositoryItem<K>, RepositoryError> {
        let repository = self.repository().await?;
        let stored = codec::encode(item)?;
        let persisted = repository.update_or_create(stored).await?;
        codec::decode::<K>(&persisted)
    }

    /// Delete the records matching `ids`. Missing ids are not an error.
    pub async fn delete_by_ids(&self, ids: Vec<String>) -> Result<(), RepositoryError> {
        let repository = self.repository().await?;
        let stored = repository.get_some(ids).await?;
        repository.delete_by_list(stored).await
    }

    /// Delete every record whose indexed column `key` equals `value`.
    pub async fn delete_all_matching_property(
        &self,
        key: K::Index,
        value: &str,
    ) -> Result<(), RepositoryError> {
        let repository = self.repository().await?;
        let stored = repository
            .get_all_by_property(key.field_name(), value)
            .await?;
        repository.delete_by_list(stored).await
    }

    /// Delete every record in the collection.
    pub async fn delete_all(&self) -> Result<(), RepositoryError> {
        let repository = self.repository().await?;
        let stored = repository.get_all().await?;
        repository.delete_by_list(stored).await
    }

    async fn bind_repository(&self) -> Result<Arc<dyn Repository>, RepositoryError> {
        self.shared_client.wait_for_initialization().await;
        let client = self.shared_client.get_client().ok_or_else(|| {
            RepositoryError::configuration("shared client is ready but has no usable connection")
        })?;
        self.initializer.initialize_repository(client).await
    }

    /// Resolve the bound repository for one operation.
    ///
    /// Awaits the shared client first, then waits out an in-flight
    /// initialization; only a handle missing with no initialization in
    /// flight is fatal.
    async fn repository(&self) -> Result<Arc<dyn Repository>, RepositoryError> {
        self.shared_client.wait_for_initialization().await;
        let mut rx = self.state.subscribe();
        let state = rx
            .wait_for(|state| !matches!(state, ServiceState::Initializing))
            .await
            .map_err(|_| RepositoryError::not_initialized(K::ENTITY_TYPE))?;
        match &*state {
            ServiceState::Ready(repository) => Ok(Arc::clone(repository)),
            _ => Err(RepositoryError::not_initialized(K::ENTITY_TYPE)),
        }
    }
}
