//! Lifecycle event bus for repository services.
//!
//! One bus instance per service; no global registry. Callbacks run
//! synchronously, in subscription order, on the publishing task.

use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Lifecycle events a repository service can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryServiceEvent {
    /// The service has bound its repository handle and is ready.
    Initialized,
}

type Callback = Arc<dyn Fn(RepositoryServiceEvent) + Send + Sync>;

struct Registration {
    id: u64,
    event: RepositoryServiceEvent,
    callback: Callback,
}

struct Registry {
    next_id: u64,
    /// `None` after teardown; the bus is inert from then on.
    entries: Option<Vec<Registration>>,
}

/// Per-service publish/subscribe bus for lifecycle events.
pub struct ServiceObserver {
    inner: Arc<Mutex<Registry>>,
}

/// Handle returned by [`ServiceObserver::subscribe`]; consume it to
/// remove the registration. Dropping it without calling
/// [`Subscription::unsubscribe`] leaves the callback registered for the
/// life of the bus.
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut guard = registry.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(entries) = guard.entries.as_mut() {
                entries.retain(|entry| entry.id != self.id);
            }
        }
    }
}

impl ServiceObserver {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry {
                next_id: 0,
                entries: Some(Vec::new()),
            })),
        }
    }

    /// Register a callback for an event.
    ///
    /// After teardown this is a no-op: the returned handle is inert.
    pub fn subscribe(
        &self,
        event: RepositoryServiceEvent,
        callback: impl Fn(RepositoryServiceEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = guard.next_id;
        guard.next_id += 1;
        if let Some(entries) = guard.entries.as_mut() {
            entries.push(Registration {
                id,
                event,
                callback: Arc::new(callback),
            });
        }
        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Invoke every currently-registered callback for `event`,
    /// synchronously, in subscription order.
    pub fn publish(&self, event: RepositoryServiceEvent) {
        // Clone the callbacks out so a callback may subscribe or
        // unsubscribe without deadlocking on the registry lock.
        let callbacks: Vec<Callback> = {
            let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            match guard.entries.as_ref() {
                Some(entries) => entries
                    .iter()
                    .filter(|entry| entry.event == event)
                    .map(|entry| Arc::clone(&entry.callback))
                    .collect(),
                None => return,
            }
        };
        for callback in callbacks {
            callback(event);
        }
    }

    pub fn has_subscribers(&self, event: RepositoryServiceEvent) -> bool {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .entries
            .as_ref()
            .is_some_and(|entries| entries.iter().any(|entry| entry.event == event))
    }

    /// Remove all subscriptions and make the bus inert. Safe to call
    /// more than once.
    pub fn teardown(&self) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.entries = None;
    }
}

impl Default for ServiceObserver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn callbacks_run_in_subscription_order() {
        let observer = ServiceObserver::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&order);
        let _a = observer.subscribe(RepositoryServiceEvent::Initialized, move |_| {
            first.lock().unwrap().push(1);
        });
        let second = Arc::clone(&order);
        let _b = observer.subscribe(RepositoryServiceEvent::Initialized, move |_| {
            second.lock().unwrap().push(2);
        });

        observer.publish(RepositoryServiceEvent::Initialized);
        assert_eq!(*order.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn unsubscribe_removes_only_that_callback() {
        let observer = ServiceObserver::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let kept = Arc::clone(&calls);
        let _keep = observer.subscribe(RepositoryServiceEvent::Initialized, move |_| {
            kept.fetch_add(1, Ordering::SeqCst);
        });
        let dropped = Arc::clone(&calls);
        let gone = observer.subscribe(RepositoryServiceEvent::Initialized, move |_| {
            dropped.fetch_add(10, Ordering::SeqCst);
        });
        gone.unsubscribe();

        observer.publish(RepositoryServiceEvent::Initialized);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn has_subscribers_reflects_registrations() {
        let observer = ServiceObserver::new();
        assert!(!observer.has_subscribers(RepositoryServiceEvent::Initialized));
        let subscription = observer.subscribe(RepositoryServiceEvent::Initialized, |_| {});
        assert!(observer.has_subscribers(RepositoryServiceEvent::Initialized));
        subscription.unsubscribe();
        assert!(!observer.has_subscribers(RepositoryServiceEvent::Initialized));
    }

    #[test]
    fn bus_is_inert_after_teardown() {
        let observer = ServiceObserver::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let before = Arc::clone(&calls);
        let _early = observer.subscribe(RepositoryServiceEvent::Initialized, move |_| {
            before.fetch_add(1, Ordering::SeqCst);
        });

        observer.teardown();
        observer.teardown(); // second teardown must not panic

        let after = Arc::clone(&calls);
        let late = observer.subscribe(RepositoryServiceEvent::Initialized, move |_| {
            after.fetch_add(1, Ordering::SeqCst);
        });
        observer.publish(RepositoryServiceEvent::Initialized);
        late.unsubscribe();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!observer.has_subscribers(RepositoryServiceEvent::Initialized));
    }
}
