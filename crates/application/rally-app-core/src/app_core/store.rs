use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

/// Holds the latest immutable snapshot of a workflow's state.
///
/// Every publish replaces the whole snapshot. Subscribers get the snapshot
/// current at subscription time, then every later one in publish order.
pub struct StateStore<S> {
    inner: Arc<Mutex<Inner<S>>>,
}

struct Inner<S> {
    current: S,
    version: u64,
    subscribers: Vec<mpsc::UnboundedSender<S>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("snapshot is stale: expected version {expected}, store is at {actual}")]
pub struct StaleSnapshot {
    pub expected: u64,
    pub actual: u64,
}

impl<S> Clone for StateStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: Default + Clone + Send + 'static> Default for StateStore<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Clone + Send + 'static> StateStore<S> {
    pub fn new(state: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                current: state,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        // A panicking transform never leaves a half-written snapshot behind.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> S {
        self.lock().current.clone()
    }

    /// Current snapshot together with its version, for `compare_and_replace`.
    pub fn snapshot(&self) -> (u64, S) {
        let guard = self.lock();
        (guard.version, guard.current.clone())
    }

    pub fn version(&self) -> u64 {
        self.lock().version
    }

    /// Replace the snapshot with `transform(current)` in one step.
    ///
    /// `transform` runs while the store is held and must not touch the store.
    pub fn update(&self, transform: impl FnOnce(&S) -> S) {
        let mut guard = self.lock();
        let next = transform(&guard.current);
        guard.publish(next);
    }

    /// Last writer wins: overwrites whatever is current.
    pub fn replace(&self, next: S) {
        self.lock().publish(next);
    }

    /// Replace only if nothing was published since `expected` was read.
    /// Returns the new version.
    pub fn compare_and_replace(&self, expected: u64, next: S) -> Result<u64, StaleSnapshot> {
        let mut guard = self.lock();
        if guard.version != expected {
            return Err(StaleSnapshot {
                expected,
                actual: guard.version,
            });
        }
        guard.publish(next);
        Ok(guard.version)
    }

    pub fn subscribe(&self) -> StateSubscription<S> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut guard = self.lock();
        // Cannot fail: the receiver is still in hand.
        let _ = tx.send(guard.current.clone());
        guard.subscribers.push(tx);
        StateSubscription { rx }
    }

    pub fn subscriber_count(&self) -> usize {
        let mut guard = self.lock();
        guard.subscribers.retain(|tx| !tx.is_closed());
        guard.subscribers.len()
    }
}

impl<S: Clone> Inner<S> {
    fn publish(&mut self, next: S) {
        self.version += 1;
        self.current = next;
        let current = &self.current;
        self.subscribers.retain(|tx| tx.send(current.clone()).is_ok());
    }
}

/// Ordered feed of snapshots. Dropping it unsubscribes.
pub struct StateSubscription<S> {
    rx: mpsc::UnboundedReceiver<S>,
}

impl<S> StateSubscription<S> {
    /// Waits for the next snapshot; `None` once the store is gone.
    pub async fn recv(&mut self) -> Option<S> {
        self.rx.recv().await
    }

    /// Next already-published snapshot, without waiting.
    pub fn try_recv(&mut self) -> Option<S> {
        self.rx.try_recv().ok()
    }
}

impl<S> Stream for StateSubscription<S> {
    type Item = S;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<S>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_applies_transform_to_current() {
        let store = StateStore::new(1u32);
        store.update(|n| n + 1);
        store.update(|n| n * 10);
        assert_eq!(store.current(), 20);
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn late_subscriber_sees_only_latest_then_new_values() {
        let store = StateStore::new(0u32);
        for n in 1..=3 {
            store.replace(n);
        }

        let mut sub = store.subscribe();
        assert_eq!(sub.try_recv(), Some(3));
        assert_eq!(sub.try_recv(), None);

        store.replace(4);
        store.replace(5);
        assert_eq!(sub.try_recv(), Some(4));
        assert_eq!(sub.try_recv(), Some(5));
    }

    #[test]
    fn compare_and_replace_rejects_stale_version() {
        let store = StateStore::new("a".to_string());
        let (version, _) = store.snapshot();
        store.replace("b".to_string());

        let err = store
            .compare_and_replace(version, "c".to_string())
            .unwrap_err();
        assert_eq!(err, StaleSnapshot { expected: 0, actual: 1 });
        assert_eq!(store.current(), "b");

        let (version, _) = store.snapshot();
        assert_eq!(store.compare_and_replace(version, "c".to_string()), Ok(2));
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let store = StateStore::new(0u8);
        let a = store.subscribe();
        let _b = store.subscribe();
        assert_eq!(store.subscriber_count(), 2);
        drop(a);
        store.replace(1);
        assert_eq!(store.subscriber_count(), 1);
    }
}
