//! Action creators.
//!
//! [`TodoActions`] turns user intents into [`TodoAction`] values and hands
//! them to the dispatcher. Items are passed by reference; the creator reads
//! whatever it needs (id, parent, completed flag) from them.
//!
//! Pass items taken from a snapshot such as `TodoApp::get_all`, never items
//! borrowed inside `TodoStore::state`: the store cannot apply an action while
//! its state is borrowed.

use crate::types::{ItemRef, RootItem, StatusFilter, TodoAction};
use nested_todo_runtime::{DispatchError, Dispatcher};
use std::sync::Arc;

/// Action creators bound to a dispatcher
#[derive(Clone)]
pub struct TodoActions {
    dispatcher: Arc<Dispatcher<TodoAction>>,
}

impl TodoActions {
    /// Creates action creators that dispatch through `dispatcher`
    #[must_use]
    pub const fn new(dispatcher: Arc<Dispatcher<TodoAction>>) -> Self {
        Self { dispatcher }
    }

    fn dispatch(&self, action: TodoAction) -> Result<(), DispatchError> {
        tracing::trace!(action_type = action.action_type(), "Dispatching action");
        self.dispatcher.dispatch(action)
    }

    /// Add an item, under `parent` when given
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::AlreadyDispatching`] if another dispatch is in progress.
    pub fn create(&self, text: impl Into<String>, parent: Option<&RootItem>) -> Result<(), DispatchError> {
        self.dispatch(TodoAction::create(text, parent.map(|root| root.id.clone())))
    }

    /// Replace an item's text
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::AlreadyDispatching`] if another dispatch is in progress.
    pub fn update_text<'a>(
        &self,
        item: impl Into<ItemRef<'a>>,
        text: impl Into<String>,
    ) -> Result<(), DispatchError> {
        self.dispatch(TodoAction::update_text(item.into().address(), text))
    }

    /// Delete an item (a root takes its children)
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::AlreadyDispatching`] if another dispatch is in progress.
    pub fn remove<'a>(&self, item: impl Into<ItemRef<'a>>) -> Result<(), DispatchError> {
        self.dispatch(TodoAction::remove(item.into().address()))
    }

    /// Delete every item
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::AlreadyDispatching`] if another dispatch is in progress.
    pub fn remove_all(&self) -> Result<(), DispatchError> {
        self.dispatch(TodoAction::RemoveAll)
    }

    /// Delete completed items
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::AlreadyDispatching`] if another dispatch is in progress.
    pub fn remove_completed(&self) -> Result<(), DispatchError> {
        self.dispatch(TodoAction::RemoveCompleted)
    }

    /// Flip an item's completed flag
    ///
    /// Sends `UndoComplete` for a completed item and `Complete` otherwise,
    /// based on the flag of the item as passed in.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::AlreadyDispatching`] if another dispatch is in progress.
    pub fn toggle_complete<'a>(&self, item: impl Into<ItemRef<'a>>) -> Result<(), DispatchError> {
        let item = item.into();
        let action = if item.completed() {
            TodoAction::undo_complete(item.address())
        } else {
            TodoAction::complete(item.address())
        };
        self.dispatch(action)
    }

    /// Complete everything, or reopen everything if all roots are done
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::AlreadyDispatching`] if another dispatch is in progress.
    pub fn toggle_complete_all(&self) -> Result<(), DispatchError> {
        self.dispatch(TodoAction::ToggleCompleteAll)
    }

    /// Record the view filter
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::AlreadyDispatching`] if another dispatch is in progress.
    pub fn set_status_filter(&self, filter: StatusFilter) -> Result<(), DispatchError> {
        self.dispatch(TodoAction::SetStatusFilter { filter })
    }
}

impl std::fmt::Debug for TodoActions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoActions")
            .field("handlers", &self.dispatcher.handler_count())
            .finish()
    }
}
