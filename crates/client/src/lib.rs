//! Client-side data-access layer for the opsboard dashboard.
//!
//! The heart of this crate is the generic repository service in
//! [`repository`]: a storage-agnostic orchestrator that defers backend
//! connection until first use, wraps typed entities as opaque stored
//! records, supports equality lookups over indexed columns, and emits
//! lifecycle events. [`services`] holds the two concrete
//! specializations (workspaces, and users scoped to a workspace).
//! [`http`] is the thin dashboard API client used for authentication
//! and direct CRUD endpoints.

pub mod http;
pub mod repository;
pub mod services;

pub use http::{ClientError, DashboardClient};
pub use repository::{
    EntityCodec, IndexKey, NoIndex, Repository, RepositoryError, RepositoryInitializer,
    RepositoryItem, RepositoryService, RepositoryServiceEvent, SharedClientHandle,
    SharedClientService, StoredRepositoryItem, Subscription,
};
pub use services::{
    UserRepositoryItem, UserRepositoryService, WorkspaceRepositoryItem,
    WorkspaceRepositoryService,
};
