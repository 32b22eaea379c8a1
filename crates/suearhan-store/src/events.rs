//! Change notification hub.
//!
//! A single broadcast channel scoped to the running process, with no payload
//! beyond "something changed".  The store owns one [`ChangeHub`] and fires it
//! after every durable write; observers re-fetch whatever collections they
//! care about.  The hub never says *which* collection changed, so observers
//! must be idempotent under "re-read everything".

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// A registered change observer.  Invoked with no arguments on every write.
pub type Observer = Arc<dyn Fn() + Send + Sync + 'static>;

/// Handle returned by [`ChangeHub::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Observer registry owned by the store.
///
/// Broadcasts happen synchronously in the caller's execution context, in
/// subscription order, strictly after the corresponding write is durable --
/// so an observer reacting to a broadcast always sees the new state.
#[derive(Default)]
pub struct ChangeHub {
    observers: Mutex<BTreeMap<u64, Observer>>,
    next_id: AtomicU64,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a change observer and return its id.
    pub fn subscribe<F>(&self, callback: F) -> SubscriberId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.observers
            .lock()
            .expect("observer registry poisoned")
            .insert(id, Arc::new(callback));
        SubscriberId(id)
    }

    /// Remove an observer.  Returns `false` if the id was already gone.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.observers
            .lock()
            .expect("observer registry poisoned")
            .remove(&id.0)
            .is_some()
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        self.observers
            .lock()
            .expect("observer registry poisoned")
            .len()
    }

    /// Invoke every registered observer.
    ///
    /// The registry lock is released before any callback runs, so observers
    /// may re-enter the store (including reads that trigger a purge-write
    /// and a nested broadcast) and may subscribe or unsubscribe.
    pub fn broadcast(&self) {
        let snapshot: Vec<Observer> = self
            .observers
            .lock()
            .expect("observer registry poisoned")
            .values()
            .cloned()
            .collect();
        tracing::trace!(observers = snapshot.len(), "broadcasting change");
        for callback in snapshot {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn subscribe_broadcast_unsubscribe() {
        let hub = ChangeHub::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = Arc::clone(&hits);
        let id = hub.subscribe(move || {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(hub.observer_count(), 1);

        hub.broadcast();
        hub.broadcast();
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        assert!(hub.unsubscribe(id));
        assert!(!hub.unsubscribe(id));

        hub.broadcast();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn broadcast_reaches_every_observer() {
        let hub = ChangeHub::new();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let hits_clone = Arc::clone(&hits);
            hub.subscribe(move || {
                hits_clone.fetch_add(1, Ordering::SeqCst);
            });
        }

        hub.broadcast();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }
}
