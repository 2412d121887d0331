//! Deferred shared connection to the storage backend.
//!
//! The connection moves through three explicit states: `NotStarted`
//! (nothing attempted), `Pending` (a connect future is running), and
//! `Ready` (the connection is live). Waiters suspend on a watch
//! channel instead of polling a nullable global.

use std::future::Future;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::ports::SharedClientHandle;

/// Externally observable connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    NotStarted,
    Pending,
    Ready,
}

enum SharedState<C> {
    NotStarted,
    Pending,
    Ready(C),
}

/// Concrete shared client: one instance is shared by every repository
/// service talking to the same backend.
pub struct SharedClientService<C: Clone + Send + Sync + 'static> {
    state: watch::Sender<SharedState<C>>,
}

impl<C: Clone + Send + Sync + 'static> SharedClientService<C> {
    pub fn new() -> Self {
        Self {
            state: watch::Sender::new(SharedState::NotStarted),
        }
    }

    pub fn state(&self) -> ConnectionState {
        match &*self.state.borrow() {
            SharedState::NotStarted => ConnectionState::NotStarted,
            SharedState::Pending => ConnectionState::Pending,
            SharedState::Ready(_) => ConnectionState::Ready,
        }
    }

    /// Drive `connect` to completion and publish the connection.
    ///
    /// Only the first call does anything; later calls return
    /// immediately. On failure the state reverts to `NotStarted` so the
    /// owner may retry.
    pub async fn start<F, E>(&self, connect: F) -> Result<(), E>
    where
        F: Future<Output = Result<C, E>>,
    {
        let claimed = self.state.send_if_modified(|state| {
            if matches!(state, SharedState::NotStarted) {
                *state = SharedState::Pending;
                true
            } else {
                false
            }
        });
        if !claimed {
            warn!("shared client start ignored: connection already started");
            return Ok(());
        }

        match connect.await {
            Ok(client) => {
                debug!("shared client connection established");
                self.state.send_replace(SharedState::Ready(client));
                Ok(())
            }
            Err(e) => {
                self.state.send_replace(SharedState::NotStarted);
                Err(e)
            }
        }
    }
}

impl<C: Clone + Send + Sync + 'static> Default for SharedClientService<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<C: Clone + Send + Sync + 'static> SharedClientHandle<C> for SharedClientService<C> {
    async fn wait_for_initialization(&self) {
        let mut rx = self.state.subscribe();
        // Cannot fail while `self` (the sender) is alive.
        let _ = rx
            .wait_for(|state| matches!(state, SharedState::Ready(_)))
            .await;
    }

    fn get_client(&self) -> Option<C> {
        match &*self.state.borrow() {
            SharedState::Ready(client) => Some(client.clone()),
            _ => None,
        }
    }
}
