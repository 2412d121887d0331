//! Concrete repository services for the dashboard's entity collections.

pub mod user_repository;
pub mod workspace_repository;

pub use user_repository::{UserCodec, UserIndex, UserRepositoryItem, UserRepositoryService};
pub use workspace_repository::{
    WorkspaceCodec, WorkspaceRepositoryItem, WorkspaceRepositoryService,
};
