//! Configuration for the to-do application.
//!
//! Values come from defaults, builder methods, or environment variables:
//!
//! | Variable | Values | Default |
//! |---|---|---|
//! | `TODO_ID_SCHEME` | `timestamp`, `uuid` | `timestamp` |
//! | `TODO_INITIAL_FILTER` | `all`, `active`, `completed` | `all` |
//! | `TODO_PROPAGATE_CHILD_COMPLETION` | `true`, `false` | `false` |
//!
//! # Example
//!
//! ```no_run
//! use nested_todo::config::TodoConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TodoConfig::from_env()?;
//! println!("Id scheme: {}", config.id_scheme);
//! # Ok(())
//! # }
//! ```

use crate::environment::{TimestampIdGenerator, TodoEnvironment, UuidIdGenerator};
use crate::error::ConfigError;
use crate::types::StatusFilter;
use nested_todo_core::environment::{IdGenerator, SystemClock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

const ID_SCHEME_VAR: &str = "TODO_ID_SCHEME";
const INITIAL_FILTER_VAR: &str = "TODO_INITIAL_FILTER";
const PROPAGATE_VAR: &str = "TODO_PROPAGATE_CHILD_COMPLETION";

/// How new item ids are produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    /// Base-32 creation time plus a sequence number
    #[default]
    Timestamp,
    /// Random v4 UUIDs
    Uuid,
}

impl IdScheme {
    /// Builds the generator for this scheme
    #[must_use]
    pub fn generator(self) -> Arc<dyn IdGenerator> {
        match self {
            Self::Timestamp => Arc::new(TimestampIdGenerator::new(SystemClock)),
            Self::Uuid => Arc::new(UuidIdGenerator),
        }
    }

    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "timestamp" => Ok(Self::Timestamp),
            "uuid" => Ok(Self::Uuid),
            _ => Err(ConfigError::InvalidValue {
                key: ID_SCHEME_VAR,
                value: value.to_string(),
                reason: "expected timestamp or uuid".to_string(),
            }),
        }
    }
}

impl fmt::Display for IdScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp => f.write_str("timestamp"),
            Self::Uuid => f.write_str("uuid"),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoConfig {
    /// Id generation scheme
    pub id_scheme: IdScheme,
    /// Filter the store starts with
    pub initial_filter: StatusFilter,
    /// Re-derive a root's flag whenever one of its children changes
    pub propagate_child_completion: bool,
}

impl TodoConfig {
    /// Default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the id scheme
    #[must_use]
    pub const fn with_id_scheme(mut self, id_scheme: IdScheme) -> Self {
        self.id_scheme = id_scheme;
        self
    }

    /// Set the initial status filter
    #[must_use]
    pub const fn with_initial_filter(mut self, filter: StatusFilter) -> Self {
        self.initial_filter = filter;
        self
    }

    /// Enable or disable child-to-parent completion propagation
    #[must_use]
    pub const fn with_child_completion_propagation(mut self, enabled: bool) -> Self {
        self.propagate_child_completion = enabled;
        self
    }

    /// Load configuration from process environment variables
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set but cannot
    /// be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is present but
    /// cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ID_SCHEME_VAR) {
            config.id_scheme = IdScheme::parse(&value)?;
        }

        if let Some(value) = lookup(INITIAL_FILTER_VAR) {
            config.initial_filter =
                value
                    .parse::<StatusFilter>()
                    .map_err(|error| ConfigError::InvalidValue {
                        key: INITIAL_FILTER_VAR,
                        value: value.clone(),
                        reason: error.to_string(),
                    })?;
        }

        if let Some(value) = lookup(PROPAGATE_VAR) {
            config.propagate_child_completion = parse_bool(PROPAGATE_VAR, &value)?;
        }

        tracing::debug!(
            id_scheme = %config.id_scheme,
            initial_filter = %config.initial_filter,
            propagate_child_completion = config.propagate_child_completion,
            "Loaded configuration"
        );

        Ok(config)
    }

    /// Builds the reducer environment this configuration describes
    #[must_use]
    pub fn environment(&self) -> TodoEnvironment {
        TodoEnvironment::new(self.id_scheme.generator())
            .with_child_completion_propagation(self.propagate_child_completion)
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
