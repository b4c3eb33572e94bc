//! Error types for the to-do domain.

use crate::types::{ItemAddress, TodoId};
use thiserror::Error;

/// Reasons a state mutation did not apply
///
/// These never reach callers of `dispatch`; the reducer logs them and
/// decides whether subscribers are notified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// Text was empty after trimming
    #[error("Todo text cannot be empty")]
    EmptyText,

    /// No item lives at the given address
    #[error("No todo at {address}")]
    NotFound {
        /// The stale address
        address: ItemAddress,
    },

    /// A child was created under a root that does not exist
    #[error("Parent todo {parent_id} not found")]
    ParentNotFound {
        /// The missing root
        parent_id: TodoId,
    },
}

/// Returned by `StatusFilter::from_str` for unknown filter names
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown status filter \"{0}\" (expected all, active or completed)")]
pub struct ParseStatusFilterError(pub String);

/// Errors loading [`TodoConfig`](crate::config::TodoConfig) from the environment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to a value that could not be parsed
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        /// Environment variable name
        key: &'static str,
        /// The raw value
        value: String,
        /// What was expected
        reason: String,
    },
}

/// Why a deserialized [`TodoState`](crate::types::TodoState) was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidStateError {
    /// An item is stored under a key other than its own id
    #[error("Todo stored under key {key} has id {id}")]
    KeyMismatch {
        /// Map key the item was found under
        key: TodoId,
        /// The item's own id
        id: TodoId,
    },

    /// A child names a different root than the one holding it
    #[error("Child todo {id} names parent {parent_id} but is stored under {root_id}")]
    ParentMismatch {
        /// The child
        id: TodoId,
        /// The parent the child names
        parent_id: TodoId,
        /// The root whose map holds the child
        root_id: TodoId,
    },

    /// Text is empty or carries surrounding whitespace
    #[error("Todo {id} has blank or untrimmed text")]
    InvalidText {
        /// The offending item
        id: TodoId,
    },
}
