//! A two-tier to-do list store.
//!
//! Items are either roots or children of a root; there is no third level.
//! All changes go through one pipeline:
//!
//! ```text
//! TodoActions ──▶ Dispatcher ──▶ TodoStore ──▶ TodoReducer
//!                                    │
//!                                    └──▶ subscribers (re-read the store)
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use nested_todo::{TodoApp, TodoConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let app = TodoApp::init(&TodoConfig::default());
//! app.subscribe(|| println!("changed"));
//!
//! app.actions().create("Groceries", None)?;
//! let groceries = app.get_all().into_values().next().ok_or("missing")?;
//! app.actions().create("Milk", Some(&groceries))?;
//! app.actions().toggle_complete(&groceries)?;
//!
//! println!("All done: {}", app.are_all_completed());
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod app;
pub mod config;
pub mod environment;
pub mod error;
pub mod reducer;
pub mod types;

use nested_todo_runtime::Store;

/// The store specialised for the to-do list
pub type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

// Re-export commonly used types
pub use actions::TodoActions;
pub use app::TodoApp;
pub use config::{IdScheme, TodoConfig};
pub use environment::{TimestampIdGenerator, TodoEnvironment, UuidIdGenerator};
pub use error::{ConfigError, InvalidStateError, ParseStatusFilterError, TodoError};
pub use reducer::TodoReducer;
pub use types::{
    ChildItem, ItemAddress, ItemRef, RootItem, StatusFilter, TodoAction, TodoId, TodoState,
};
