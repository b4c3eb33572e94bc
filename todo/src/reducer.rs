//! Reducer logic for the to-do list.
//!
//! Every action that passes its precondition mutates the state and asks for
//! a change notification. Blank text on `Create`/`UpdateText` is the only
//! precondition; such actions leave the state alone and notify nobody.
//!
//! Stale ids are not errors at this boundary: the mutation is skipped, the
//! reason is logged, and subscribers are still notified.

use crate::environment::TodoEnvironment;
use crate::error::TodoError;
use crate::types::{ItemAddress, TodoAction, TodoState};
use nested_todo_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Reducer for the to-do list
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Whether `action` creates, completes, reopens or removes a child
    const fn touches_child(action: &TodoAction) -> bool {
        matches!(
            action,
            TodoAction::Create { parent_id: Some(_), .. }
                | TodoAction::Complete { parent_id: Some(_), .. }
                | TodoAction::UndoComplete { parent_id: Some(_), .. }
                | TodoAction::Remove { parent_id: Some(_), .. }
        )
    }

    /// Maps a mutation result to the effects of the action
    fn outcome(
        action_type: &'static str,
        result: Result<(), TodoError>,
    ) -> SmallVec<[Effect<TodoAction>; 4]> {
        match result {
            Ok(()) => smallvec![Effect::Notify],
            Err(TodoError::EmptyText) => {
                tracing::debug!(action_type, "Ignoring action with blank text");
                SmallVec::new()
            },
            Err(error) => {
                tracing::debug!(action_type, error = %error, "Action did not apply");
                smallvec![Effect::Notify]
            },
        }
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let action_type = action.action_type();
        tracing::debug!(action_type, "Reducing action");
        let derive_parents = env.propagate_child_completion && Self::touches_child(&action);

        let result = match action {
            TodoAction::Create { text, parent_id } => state
                .create(&text, parent_id.as_ref(), env.ids.as_ref())
                .map(|id| {
                    tracing::trace!(%id, "Created todo");
                }),

            TodoAction::UpdateText {
                id,
                parent_id,
                text,
            } => state.update_text(&ItemAddress { id, parent_id }, &text),

            TodoAction::Complete { id, parent_id } => {
                state.update_completed(&ItemAddress { id, parent_id }, true)
            },

            TodoAction::UndoComplete { id, parent_id } => {
                state.update_completed(&ItemAddress { id, parent_id }, false)
            },

            TodoAction::ToggleCompleteAll => {
                let completed = !state.are_all_completed();
                state.update_completed_all(completed);
                Ok(())
            },

            TodoAction::Remove { id, parent_id } => state.remove(&ItemAddress { id, parent_id }),

            TodoAction::RemoveAll => {
                state.remove_all();
                Ok(())
            },

            TodoAction::RemoveCompleted => {
                state.remove_completed();
                Ok(())
            },

            TodoAction::SetStatusFilter { filter } => {
                state.set_status_filter(filter);
                Ok(())
            },
        };

        if derive_parents && result.is_ok() {
            state.complete_parents();
        }

        Self::outcome(action_type, result)
    }
}
