//! Application wiring.
//!
//! [`TodoApp::init`] builds the single dispatcher and store for a process,
//! registers the store with the dispatcher, and hands out action creators.

use crate::actions::TodoActions;
use crate::config::TodoConfig;
use crate::reducer::TodoReducer;
use crate::types::{RootItem, StatusFilter, TodoAction, TodoId, TodoState};
use crate::TodoStore;
use nested_todo_runtime::{DispatchToken, Dispatcher, SubscriptionId};
use std::collections::HashMap;
use std::sync::Arc;

/// One dispatcher, one store, and the action creators bound to them
#[derive(Clone)]
pub struct TodoApp {
    dispatcher: Arc<Dispatcher<TodoAction>>,
    store: TodoStore,
    actions: TodoActions,
    token: DispatchToken,
}

impl TodoApp {
    /// Wire up a fresh application from `config`
    #[must_use]
    pub fn init(config: &TodoConfig) -> Self {
        let dispatcher = Arc::new(Dispatcher::new());
        let store = TodoStore::new(
            TodoState::with_status_filter(config.initial_filter),
            TodoReducer::new(),
            config.environment(),
        );
        let token = store.register_with(&dispatcher);
        let actions = TodoActions::new(Arc::clone(&dispatcher));

        tracing::info!(
            token = %token,
            id_scheme = %config.id_scheme,
            "To-do store registered"
        );

        Self {
            dispatcher,
            store,
            actions,
            token,
        }
    }

    /// Action creators for this application
    #[must_use]
    pub const fn actions(&self) -> &TodoActions {
        &self.actions
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &TodoStore {
        &self.store
    }

    /// The dispatcher every action goes through
    #[must_use]
    pub const fn dispatcher(&self) -> &Arc<Dispatcher<TodoAction>> {
        &self.dispatcher
    }

    /// The store's registration on the dispatcher
    #[must_use]
    pub const fn dispatch_token(&self) -> DispatchToken {
        self.token
    }

    /// Snapshot of every root item, keyed by id
    #[must_use]
    pub fn get_all(&self) -> HashMap<TodoId, RootItem> {
        self.store.state(|state| state.items().clone())
    }

    /// The current status filter
    #[must_use]
    pub fn status_filter(&self) -> StatusFilter {
        self.store.state(TodoState::status_filter)
    }

    /// Whether every root is completed
    #[must_use]
    pub fn are_all_completed(&self) -> bool {
        self.store.state(TodoState::are_all_completed)
    }

    /// Snapshot of the whole state
    #[must_use]
    pub fn snapshot(&self) -> TodoState {
        self.store.state(Clone::clone)
    }

    /// Register a change listener
    ///
    /// The listener receives no payload; it should re-read the store. It may
    /// read but must not dispatch.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }

    /// Remove a change listener
    ///
    /// Returns `false` if the id was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}

impl std::fmt::Debug for TodoApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoApp")
            .field("token", &self.token)
            .field("subscribers", &self.store.subscriber_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::IdScheme;
    use nested_todo_testing::ChangeCounter;

    #[test]
    fn init_registers_one_store() {
        let app = TodoApp::init(&TodoConfig::default());
        assert_eq!(app.dispatcher().handler_count(), 1);
        assert_eq!(app.dispatch_token().to_string(), "ID_1");
        assert!(app.get_all().is_empty());
        assert!(app.are_all_completed());
    }

    #[test]
    fn initial_filter_comes_from_config() {
        let config = TodoConfig::new().with_initial_filter(StatusFilter::Active);
        let app = TodoApp::init(&config);
        assert_eq!(app.status_filter(), StatusFilter::Active);
    }

    #[test]
    fn actions_reach_the_store_and_notify() {
        let app = TodoApp::init(&TodoConfig::new().with_id_scheme(IdScheme::Uuid));
        let changes = ChangeCounter::new();
        let id = app.subscribe(changes.listener());

        app.actions().create("Groceries", None).unwrap();
        let groceries = app.get_all().into_values().next().unwrap();
        app.actions().create("Milk", Some(&groceries)).unwrap();

        assert_eq!(changes.count(), 2);
        assert_eq!(app.snapshot().total_count(), 2);

        assert!(app.unsubscribe(id));
        app.actions().remove_all().unwrap();
        assert_eq!(changes.count(), 2);
        assert!(app.get_all().is_empty());
    }
}
