//! # Nested Todo Runtime
//!
//! Runtime implementation for the nested-todo architecture.
//!
//! This crate provides the pieces that sit around a reducer:
//!
//! - **Store**: owns state, runs the reducer, executes effects, notifies subscribers
//! - **Dispatcher**: synchronous, ordered, non-reentrant message bus
//! - **Listeners**: observer list behind [`Store::subscribe`]
//!
//! Everything runs synchronously on the caller's thread. An action is fully
//! reduced and its subscribers notified before `send` returns.
//!
//! ## Example
//!
//! ```ignore
//! use nested_todo_runtime::{Dispatcher, Store};
//!
//! let dispatcher = Dispatcher::new();
//! let store = Store::new(initial_state, my_reducer, environment);
//! store.register_with(&dispatcher);
//!
//! store.subscribe(|| println!("changed"));
//!
//! // Send an action through the bus
//! dispatcher.dispatch(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use nested_todo_core::{effect::Effect, reducer::Reducer};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Synchronous message bus
pub mod dispatcher;

/// Observer list for change notifications
pub mod listeners;

/// Metrics emitted by the runtime
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
    pub enum StoreError {
        /// `send()` was called from inside a change listener
        ///
        /// Listeners may read the store but must defer writes to a later
        /// dispatch.
        #[error("Cannot send an action while subscribers are being notified")]
        ReentrantSend,
    }
}

pub use dispatcher::{DispatchError, DispatchToken, Dispatcher};
pub use error::StoreError;
pub use listeners::{Listeners, SubscriptionId};

/// Clears the notifying flag when notification ends, even on panic
struct NotifyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> NotifyGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self { flag }
    }
}

impl Drop for NotifyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, Effect, Listeners, NotifyGuard, Ordering, PoisonError, Reducer, RwLock,
        StoreError, SubscriptionId, VecDeque,
    };
    use crate::dispatcher::{DispatchToken, Dispatcher};
    use crate::metrics::StoreMetrics;
    use std::marker::PhantomData;
    use std::time::Instant;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`; readers get borrowed, read-only access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (`Notify` and `Feedback`)
    /// 5. Subscribers (notified synchronously after each change)
    ///
    /// Cloning a store yields another handle to the same state and subscribers.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        listeners: Listeners,
        notifying: Arc<AtomicBool>,
        _action: PhantomData<fn() -> A>,
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                listeners: self.listeners.clone(),
                notifying: Arc::clone(&self.notifying),
                _action: PhantomData,
            }
        }
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// # Arguments
        ///
        /// - `initial_state`: The starting state for the store
        /// - `reducer`: The reducer implementation (business logic)
        /// - `environment`: Injected dependencies
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                listeners: Listeners::new(),
                notifying: Arc::new(AtomicBool::new(false)),
                _action: PhantomData,
            }
        }

        /// Send an action to the store
        ///
        /// This method:
        /// 1. Acquires the write lock on state
        /// 2. Calls the reducer with (state, action, environment)
        /// 3. Reduces any `Effect::Feedback` actions in order
        /// 4. Releases the lock
        /// 5. Notifies subscribers once if any effect asked for it
        ///
        /// # Returns
        ///
        /// `true` if subscribers were notified.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ReentrantSend`] if called while this store
        /// is notifying its subscribers.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&self, action: A) -> Result<bool, StoreError> {
            if self.notifying.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is notifying subscribers");
                StoreMetrics::record_rejected();
                return Err(StoreError::ReentrantSend);
            }

            tracing::debug!("Processing action");

            let should_notify = {
                let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
                tracing::trace!("Acquired write lock on state");

                let mut pending = VecDeque::from([action]);
                let mut should_notify = false;

                while let Some(action) = pending.pop_front() {
                    let span = tracing::debug_span!("reducer_execution");
                    let _enter = span.enter();

                    let start = Instant::now();
                    let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                    StoreMetrics::record_action(start.elapsed());

                    tracing::trace!("Reducer completed, returned {} effects", effects.len());

                    for effect in effects {
                        should_notify |= Self::collect_effect(effect, &mut pending);
                    }
                }

                should_notify
            };

            if !should_notify {
                tracing::debug!("Action produced no change notification");
                return Ok(false);
            }

            let _guard = NotifyGuard::enter(&self.notifying);
            let listeners = self.listeners.notify();
            StoreMetrics::record_notification();
            tracing::debug!(listeners, "Subscribers notified");

            Ok(true)
        }

        /// Flatten an effect, queueing feedback actions
        ///
        /// Returns `true` if the effect asks for a change notification.
        fn collect_effect(effect: Effect<A>, pending: &mut VecDeque<A>) -> bool {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    false
                },
                Effect::Notify => true,
                Effect::Feedback(action) => {
                    tracing::trace!("Queueing Effect::Feedback action");
                    pending.push_back(*action);
                    false
                },
                Effect::Sequential(effects) => {
                    tracing::trace!("Executing Effect::Sequential with {} effects", effects.len());
                    effects
                        .into_iter()
                        .fold(false, |notify, effect| {
                            Self::collect_effect(effect, pending) | notify
                        })
                },
            }
        }

        /// Read current state via a closure
        ///
        /// Access state through a closure to ensure the lock is released promptly:
        ///
        /// ```ignore
        /// let item_count = store.state(|s| s.items().len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            f(&*state)
        }

        /// Access the injected environment
        #[must_use]
        pub fn environment(&self) -> &E {
            &self.environment
        }

        /// Register a change listener
        ///
        /// The listener runs synchronously after every action that produced
        /// a `Notify` effect. It receives no payload.
        pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
        where
            F: Fn() + Send + Sync + 'static,
        {
            self.listeners.subscribe(listener)
        }

        /// Remove a change listener
        ///
        /// Returns `false` if the token was unknown.
        pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
            self.listeners.unsubscribe(id)
        }

        /// Number of registered change listeners
        #[must_use]
        pub fn subscriber_count(&self) -> usize {
            self.listeners.len()
        }

        /// Check whether subscribers are currently being notified
        #[must_use]
        pub fn is_notifying(&self) -> bool {
            self.notifying.load(Ordering::Acquire)
        }

        /// Register this store as a handler on `dispatcher`
        ///
        /// Every action delivered by the dispatcher is sent to the store.
        /// A store should be registered exactly once.
        pub fn register_with(&self, dispatcher: &Dispatcher<A>) -> DispatchToken
        where
            S: Send + Sync + 'static,
            A: Clone + 'static,
            E: Send + Sync + 'static,
            R: Send + Sync + 'static,
        {
            let store = self.clone();
            dispatcher.register(move |action: &A| {
                if let Err(error) = store.send(action.clone()) {
                    tracing::warn!(error = %error, "Store rejected dispatched action");
                }
            })
        }
    }
}

pub use store::Store;
