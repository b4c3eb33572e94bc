//! Observer list for payload-less change notifications.
//!
//! A [`Listeners`] value holds the callbacks registered through
//! [`Store::subscribe`](crate::Store::subscribe). Notification iterates a
//! snapshot of the list, so a listener that subscribes or unsubscribes while
//! being notified only affects the *next* notification.
//!
//! # Example
//!
//! ```
//! use nested_todo_runtime::listeners::Listeners;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let listeners = Listeners::new();
//! let calls = Arc::new(AtomicUsize::new(0));
//!
//! let counter = Arc::clone(&calls);
//! let id = listeners.subscribe(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! listeners.notify();
//! assert!(listeners.unsubscribe(id));
//! listeners.notify();
//!
//! assert_eq!(calls.load(Ordering::SeqCst), 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// A change listener. Receives no payload; it is expected to re-read the store.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Token returned by [`Listeners::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Ordered list of change listeners
///
/// Cloning a `Listeners` yields a handle to the same list.
#[derive(Clone, Default)]
pub struct Listeners {
    entries: Arc<Mutex<Vec<(SubscriptionId, Listener)>>>,
    next_id: Arc<AtomicU64>,
}

impl Listeners {
    /// Create an empty listener list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener, returning the token that removes it again
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));

        tracing::trace!(subscription = %id, "Listener subscribed");
        id
    }

    /// Remove a listener
    ///
    /// Returns `false` if the token was unknown (already removed).
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        let removed = entries.len() != before;

        tracing::trace!(subscription = %id, removed, "Listener unsubscribed");
        removed
    }

    /// Call every listener registered at the time of the call, in
    /// subscription order
    ///
    /// Returns the number of listeners invoked.
    pub fn notify(&self) -> usize {
        // Snapshot so listeners can (un)subscribe without deadlocking.
        let snapshot: Vec<Listener> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in &snapshot {
            listener();
        }

        snapshot.len()
    }

    /// Number of registered listeners
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if no listener is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
