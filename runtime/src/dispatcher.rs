//! Synchronous message bus.
//!
//! The [`Dispatcher`] is the single entry point for actions. Handlers are
//! registered once (typically one per store) and every dispatched action is
//! delivered to all of them, synchronously and in registration order.
//!
//! ```text
//! Action creator ──dispatch──▶ Dispatcher ──▶ handler 1 (store A)
//!                                        └──▶ handler 2 (store B)
//! ```
//!
//! A dispatch that starts while another one is still being delivered (for
//! example from inside a store's change listener) is rejected with
//! [`DispatchError::AlreadyDispatching`]. Actions are never queued.
//!
//! # Example
//!
//! ```
//! use nested_todo_runtime::dispatcher::{DispatchError, Dispatcher};
//! use std::sync::{Arc, Mutex};
//!
//! let dispatcher = Dispatcher::<&'static str>::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let log = Arc::clone(&seen);
//! dispatcher.register(move |action: &&'static str| {
//!     log.lock().unwrap_or_else(std::sync::PoisonError::into_inner).push(*action);
//! });
//!
//! dispatcher.dispatch("hello")?;
//! assert_eq!(seen.lock().unwrap_or_else(std::sync::PoisonError::into_inner).len(), 1);
//! # Ok::<(), DispatchError>(())
//! ```

use crate::metrics::DispatcherMetrics;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// A registered action handler
pub type Handler<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// Errors returned by [`Dispatcher::dispatch`]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// Another action is still being delivered
    ///
    /// Dispatching from inside a handler (or from a listener triggered by a
    /// handler) is a programming error; defer the action instead.
    #[error("Cannot dispatch in the middle of a dispatch")]
    AlreadyDispatching,
}

/// Token identifying a registered handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DispatchToken(u64);

impl std::fmt::Display for DispatchToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ID_{}", self.0)
    }
}

/// Resets the dispatching flag even if a handler panics
struct DispatchGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Synchronous, ordered, non-reentrant action dispatcher
///
/// # Type Parameters
///
/// - `A`: The action type carried by this dispatcher
pub struct Dispatcher<A> {
    handlers: Mutex<Vec<(DispatchToken, Handler<A>)>>,
    next_token: AtomicU64,
    dispatching: AtomicBool,
}

impl<A> Dispatcher<A> {
    /// Create a dispatcher with no registered handlers
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
            next_token: AtomicU64::new(1),
            dispatching: AtomicBool::new(false),
        }
    }

    /// Register a handler that will receive every dispatched action
    ///
    /// Handlers are invoked in the order they were registered.
    pub fn register<F>(&self, handler: F) -> DispatchToken
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        let token = DispatchToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((token, Arc::new(handler)));

        tracing::debug!(token = %token, "Handler registered");
        token
    }

    /// Remove a previously registered handler
    ///
    /// Returns `false` if the token was not registered.
    pub fn unregister(&self, token: DispatchToken) -> bool {
        let mut handlers = self.handlers.lock().unwrap_or_else(PoisonError::into_inner);
        let before = handlers.len();
        handlers.retain(|(registered, _)| *registered != token);
        let removed = handlers.len() != before;

        tracing::debug!(token = %token, removed, "Handler unregistered");
        removed
    }

    /// Deliver `action` to every registered handler
    ///
    /// Returns once all handlers have run.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::AlreadyDispatching`] if called while another
    /// dispatch on this dispatcher is in progress.
    #[tracing::instrument(skip(self, action), name = "dispatch")]
    pub fn dispatch(&self, action: A) -> Result<(), DispatchError> {
        if self
            .dispatching
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Rejected action: dispatch already in progress");
            DispatcherMetrics::record_rejected();
            return Err(DispatchError::AlreadyDispatching);
        }
        let _guard = DispatchGuard {
            flag: &self.dispatching,
        };

        let snapshot: Vec<Handler<A>> = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        tracing::trace!(handlers = snapshot.len(), "Delivering action");
        for handler in &snapshot {
            handler(&action);
        }
        DispatcherMetrics::record_dispatch();

        Ok(())
    }

    /// Check whether a dispatch is currently being delivered
    #[must_use]
    pub fn is_dispatching(&self) -> bool {
        self.dispatching.load(Ordering::Acquire)
    }

    /// Number of registered handlers
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<A> Default for Dispatcher<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handlers", &self.handler_count())
            .field("dispatching", &self.is_dispatching())
            .finish()
    }
}
