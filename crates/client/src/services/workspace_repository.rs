//! Workspace repository service.
//!
//! Thin specialization of the generic repository service. Workspaces
//! have no indexed columns, so no secondary lookups exist for them.

use std::sync::Arc;

use opsboard_domain::Workspace;

use crate::repository::{
    EntityCodec, NoIndex, RepositoryError, RepositoryInitializer, RepositoryItem,
    RepositoryService, RepositoryServiceEvent, SharedClientHandle, Subscription,
};

/// Codec for the workspace collection.
pub struct WorkspaceCodec;

impl EntityCodec for WorkspaceCodec {
    type Entity = Workspace;
    type Index = NoIndex;

    const ENTITY_TYPE: &'static str = "Workspace";

    fn index_value(_entity: &Workspace, key: NoIndex) -> String {
        match key {}
    }
}

pub type WorkspaceRepositoryItem = RepositoryItem<WorkspaceCodec>;

/// CRUD access to the workspace collection.
pub struct WorkspaceRepositoryService<C: Clone + Send + Sync + 'static> {
    inner: RepositoryService<C, WorkspaceCodec>,
}

impl<C: Clone + Send + Sync + 'static> WorkspaceRepositoryService<C> {
    pub fn new(
        shared_client: Arc<dyn SharedClientHandle<C>>,
        initializer: Arc<dyn RepositoryInitializer<C>>,
    ) -> Self {
        Self {
            inner: RepositoryService::new(shared_client, initializer),
        }
    }

    pub fn on(
        &self,
        event: RepositoryServiceEvent,
        callback: impl Fn(RepositoryServiceEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.inner.on(event, callback)
    }

    pub fn destroy(&self) {
        self.inner.destroy()
    }

    pub async fn initialize(&self) -> Result<(), RepositoryError> {
        self.inner.initialize().await
    }

    pub async fn get_all_workspaces(&self) -> Result<Vec<WorkspaceRepositoryItem>, RepositoryError> {
        self.inner.get_all().await
    }

    pub async fn get_some_workspaces(
        &self,
        ids: Vec<String>,
    ) -> Result<Vec<WorkspaceRepositoryItem>, RepositoryError> {
        self.inner.get_some(ids).await
    }

    pub async fn get_workspace_by_id(
        &self,
        id: &str,
    ) -> Result<Option<WorkspaceRepositoryItem>, RepositoryError> {
        self.inner.find_by_id(id).await
    }

    /// Upsert by id; ids are caller-supplied, never server-generated.
    pub async fn save_workspace(
        &self,
        item: &WorkspaceRepositoryItem,
    ) -> Result<WorkspaceRepositoryItem, RepositoryError> {
        self.inner.save(item).await
    }

    pub async fn delete_all_workspaces(&self) -> Result<(), RepositoryError> {
        self.inner.delete_all().await
    }

    pub async fn delete_some_workspaces(&self, ids: Vec<String>) -> Result<(), RepositoryError> {
        self.inner.delete_by_ids(ids).await
    }
}
