//! Generic repository core.
//!
//! `RepositoryService` orchestrates three collaborators reached through
//! port traits: a lazily-established shared client connection, a
//! strategy that binds that connection to a concrete storage backend,
//! and the storage contract itself. Entities cross the storage boundary
//! as opaque JSON `target` blobs plus denormalized indexed columns; the
//! codec in [`codec`] is the single authority reconciling the two.

pub mod codec;
pub mod error;
pub mod item;
pub mod memory;
pub mod observer;
pub mod ports;
pub mod service;
pub mod shared_client;

pub use codec::{EntityCodec, IndexKey, NoIndex};
pub use error::RepositoryError;
pub use item::{RepositoryItem, StoredRepositoryItem};
pub use memory::{InMemoryRepository, InMemoryRepositoryInitializer};
pub use observer::{RepositoryServiceEvent, ServiceObserver, Subscription};
pub use ports::{Repository, RepositoryInitializer, SharedClientHandle};
pub use service::RepositoryService;
pub use shared_client::{ConnectionState, SharedClientService};
