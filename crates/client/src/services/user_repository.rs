//! User repository service.
//!
//! Users are scoped to a workspace and carry two indexed columns:
//! `workspaceId` and the lower-cased `email`. Email lookups are
//! case-insensitive end to end because both the index and the query
//! value are folded to lower case.

use std::sync::Arc;

use opsboard_domain::User;

use crate::repository::{
    EntityCodec, IndexKey, RepositoryError, RepositoryInitializer, RepositoryItem,
    RepositoryService, RepositoryServiceEvent, SharedClientHandle, Subscription,
};

/// Indexed columns of the user collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserIndex {
    WorkspaceId,
    Email,
}

impl IndexKey for UserIndex {
    const ALL: &'static [Self] = &[UserIndex::WorkspaceId, UserIndex::Email];

    fn field_name(self) -> &'static str {
        match self {
            UserIndex::WorkspaceId => "workspaceId",
            UserIndex::Email => "email",
        }
    }
}

/// Codec for the user collection.
pub struct UserCodec;

impl EntityCodec for UserCodec {
    type Entity = User;
    type Index = UserIndex;

    const ENTITY_TYPE: &'static str = "User";

    fn index_value(entity: &User, key: UserIndex) -> String {
        match key {
            UserIndex::WorkspaceId => entity.workspace_id.clone(),
            UserIndex::Email => entity.email.to_lowercase(),
        }
    }
}

pub type UserRepositoryItem = RepositoryItem<UserCodec>;

/// CRUD access to the users of the signed-in account's workspaces.
pub struct UserRepositoryService<C: Clone + Send + Sync + 'static> {
    inner: RepositoryService<C, UserCodec>,
}

impl<C: Clone + Send + Sync + 'static> UserRepositoryService<C> {
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

    pub async fn get_all_users(&self) -> Result<Vec<UserRepositoryItem>, RepositoryError> {
        self.inner.get_all().await
    }

    pub async fn get_all_users_by_workspace_id(
        &self,
        workspace_id: &str,
    ) -> Result<Vec<UserRepositoryItem>, RepositoryError> {
        self.inner
            .get_all_by_property(UserIndex::WorkspaceId, workspace_id)
            .await
    }

    /// Case-insensitive email lookup.
    pub async fn get_all_users_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<UserRepositoryItem>, RepositoryError> {
        self.inner
            .get_all_by_property(UserIndex::Email, &email.to_lowercase())
            .await
    }

    pub async fn get_user_by_id(
        &self,
        id: &str,
    ) -> Result<Option<UserRepositoryItem>, RepositoryError> {
        self.inner.find_by_id(id).await
    }

    /// Upsert by id; ids are caller-supplied, never server-generated.
    pub async fn save_user(
        &self,
        item: &UserRepositoryItem,
    ) -> Result<UserRepositoryItem, RepositoryError> {
        self.inner.save(item).await
    }

    pub async fn delete_users_by_ids(&self, ids: Vec<String>) -> Result<(), RepositoryError> {
        self.inner.delete_by_ids(ids).await
    }

    /// Remove every user of one workspace. Offered alongside workspace
    /// deletion; referential integrity stays the caller's job.
    pub async fn delete_users_by_workspace_id(
        &self,
        workspace_id: &str,
    ) -> Result<(), RepositoryError> {
        self.inner
            .delete_all_matching_property(UserIndex::WorkspaceId, workspace_id)
            .await
    }
}
