//! Injected dependencies for the to-do reducer.

use nested_todo_core::environment::{Clock, IdGenerator, SystemClock};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Environment dependencies for the to-do reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Source of new item ids
    pub ids: Arc<dyn IdGenerator>,
    /// Re-derive a root's flag after one of its children is (un)completed
    pub propagate_child_completion: bool,
}

impl TodoEnvironment {
    /// Creates an environment using `ids`, without completion propagation
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            ids,
            propagate_child_completion: false,
        }
    }

    /// Enables or disables child-to-parent completion propagation
    #[must_use]
    pub fn with_child_completion_propagation(mut self, enabled: bool) -> Self {
        self.propagate_child_completion = enabled;
        self
    }
}

impl Default for TodoEnvironment {
    fn default() -> Self {
        Self::new(Arc::new(TimestampIdGenerator::new(SystemClock)))
    }
}

impl fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoEnvironment")
            .field("ids", &"<dyn IdGenerator>")
            .field("propagate_child_completion", &self.propagate_child_completion)
            .finish()
    }
}

/// Compact ids built from the creation time
///
/// Each id is the clock's milliseconds and a per-generator sequence number,
/// both in base 32 (`m5x3k2a0-0`, `m5x3k2a0-1`, ...). The sequence makes ids
/// unique even when many items are created within the same millisecond.
#[derive(Debug)]
pub struct TimestampIdGenerator<C> {
    clock: C,
    sequence: AtomicU64,
}

impl<C: Clock> TimestampIdGenerator<C> {
    /// Creates a generator reading time from `clock`
    #[must_use]
    pub const fn new(clock: C) -> Self {
        Self {
            clock,
            sequence: AtomicU64::new(0),
        }
    }
}

impl<C: Clock> IdGenerator for TimestampIdGenerator<C> {
    fn next_id(&self) -> String {
        let millis = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or_default();
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", to_base32(millis), to_base32(sequence))
    }
}

/// Random version 4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Lowercase base-32 digits (`0-9a-v`)
fn to_base32(mut n: u64) -> String {
    const DIGITS: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

    if n == 0 {
        return "0".to_string();
    }

    let mut out = Vec::with_capacity(13);
    while n > 0 {
        // n % 32 < 32, always a valid index
        #[allow(clippy::cast_possible_truncation)]
        out.push(DIGITS[(n % 32) as usize]);
        n /= 32;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}
