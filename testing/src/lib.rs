//! # Nested Todo Testing
//!
//! Testing utilities and helpers for nested-todo reducers and stores.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A Given-When-Then builder for reducers ([`ReducerTest`])
//! - A change-notification recorder for store subscribers
//! - Test tracing setup
//!
//! ## Example
//!
//! ```ignore
//! use nested_todo_testing::{mocks::SequentialIdGenerator, ChangeCounter};
//!
//! #[test]
//! fn test_create() {
//!     let store = TodoStore::new(TodoState::new(), TodoReducer::new(), test_environment());
//!     let changes = ChangeCounter::new();
//!     store.subscribe(changes.listener());
//!
//!     store.send(TodoAction::create("Buy milk", None)).unwrap();
//!
//!     assert_eq!(changes.count(), 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use nested_todo_core::environment::{Clock, IdGenerator};


/// Deterministic implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use nested_todo_testing::mocks::FixedClock;
    /// use nested_todo_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Predictable identifiers: `{prefix}-1`, `{prefix}-2`, ...
    ///
    /// # Example
    ///
    /// ```
    /// use nested_todo_testing::mocks::SequentialIdGenerator;
    /// use nested_todo_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new("todo");
    /// assert_eq!(ids.next_id(), "todo-1");
    /// assert_eq!(ids.next_id(), "todo-2");
    /// ```
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        prefix: String,
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator whose first id is `{prefix}-1`
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicU64::new(1),
            }
        }

        /// The id the next call to `next_id` will return
        #[must_use]
        pub fn peek(&self) -> String {
            format!("{}-{}", self.prefix, self.next.load(Ordering::SeqCst))
        }
    }

    impl Default for SequentialIdGenerator {
        fn default() -> Self {
            Self::new("id")
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::SeqCst);
            format!("{}-{n}", self.prefix)
        }
    }
}

/// Helpers for observing store subscribers
pub mod helpers {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts change notifications
    ///
    /// Hand [`ChangeCounter::listener`] to `Store::subscribe`, then assert on
    /// [`ChangeCounter::count`].
    #[derive(Debug, Clone, Default)]
    pub struct ChangeCounter {
        count: Arc<AtomicUsize>,
    }

    impl ChangeCounter {
        /// Create a counter at zero
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// A listener closure that increments this counter
        #[must_use]
        pub fn listener(&self) -> impl Fn() + Send + Sync + 'static {
            let count = Arc::clone(&self.count);
            move || {
                count.fetch_add(1, Ordering::SeqCst);
            }
        }

        /// Notifications observed so far
        #[must_use]
        pub fn count(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }

        /// Reset to zero
        pub fn reset(&self) {
            self.count.store(0, Ordering::SeqCst);
        }
    }

    /// Install a `tracing` subscriber that writes through the test harness
    ///
    /// Honors `RUST_LOG`. Safe to call from every test; only the first call
    /// installs anything.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::{ChangeCounter, init_test_tracing};
pub use mocks::{FixedClock, SequentialIdGenerator, test_clock};
pub use reducer_test::{ReducerTest, assertions};
