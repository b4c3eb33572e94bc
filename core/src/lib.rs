//! # Nested Todo Core
//!
//! Core traits and types for the nested-todo store.
//!
//! This crate provides the fundamental abstractions the rest of the workspace
//! is built on: a reducer turns `(State, Action, Environment)` into state
//! changes plus effect descriptions, and a runtime executes those effects.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state owned by a single store
//! - **Action**: Every possible input to a reducer
//! - **Reducer**: Function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Description of what the runtime should do next (not execution)
//! - **Environment**: Injected dependencies via traits (`Clock`, `IdGenerator`)
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (change notification is an effect, not a side channel)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```
//! use nested_todo_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         smallvec![Effect::Notify]
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! let effects = CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! assert_eq!(effects.len(), 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic given their
/// environment, which makes them testable without a runtime.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for TodoReducer {
    ///     type State = TodoState;
    ///     type Action = TodoAction;
    ///     type Environment = TodoEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut TodoState,
    ///         action: TodoAction,
    ///         env: &TodoEnvironment,
    ///     ) -> SmallVec<[Effect<TodoAction>; 4]> {
    ///         match action {
    ///             TodoAction::RemoveAll => {
    ///                 state.remove_all();
    ///                 smallvec![Effect::Notify]
    ///             }
    ///             _ => SmallVec::new(),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This function:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed by the runtime
        ///
        /// An empty effect list means "nothing observable happened".
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe what the runtime should do after a reducer ran.
/// They are values (not execution), so reducers stay free of callbacks.
pub mod effect {
    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store runtime
    /// once the state lock has been released.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type of the reducer that produced the effect
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Notify every store subscriber that state changed
        ///
        /// The notification carries no payload; subscribers re-read the store.
        Notify,

        /// Run effects one after another, in order
        Sequential(Vec<Effect<Action>>),

        /// Feed a follow-up action back into the same reducer
        ///
        /// The runtime reduces it right after the current action, before any
        /// subscriber is notified.
        Feedback(Box<Action>),
    }

    impl<Action> Effect<Action> {
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Feed `action` back into the reducer
        #[must_use]
        pub fn feedback(action: Action) -> Effect<Action> {
            Effect::Feedback(Box::new(action))
        }

        /// Returns true if executing this effect notifies subscribers
        #[must_use]
        pub fn notifies(&self) -> bool {
            match self {
                Effect::Notify => true,
                Effect::Sequential(effects) => effects.iter().any(Effect::notifies),
                Effect::None | Effect::Feedback(_) => false,
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All non-deterministic inputs (time, identifiers) are abstracted behind
/// traits and injected via the Environment parameter. Production
/// implementations live here; deterministic ones live in the testing crate.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use nested_todo_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let earlier = clock.now();
    /// assert!(clock.now() >= earlier);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// `IdGenerator` trait - produces identifiers for newly created entities
    ///
    /// Implementations must never hand out the same identifier twice for the
    /// lifetime of the generator.
    pub trait IdGenerator: Send + Sync {
        /// Produce the next identifier
        fn next_id(&self) -> String;
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;

    #[test]
    fn notify_is_detected_inside_sequences() {
        let effect: Effect<()> = Effect::chain(vec![Effect::None, Effect::Notify]);
        assert!(effect.notifies());
    }

    #[test]
    fn none_and_feedback_do_not_notify() {
        assert!(!Effect::<u8>::None.notifies());
        assert!(!Effect::feedback(1_u8).notifies());
        assert!(!Effect::<u8>::chain(vec![]).notifies());
    }
}
