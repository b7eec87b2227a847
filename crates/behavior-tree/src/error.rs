//! Error types for tree construction and tick evaluation.
//!
//! Two families are kept apart:
//!
//! - [`ConfigError`]: the tree was wired incorrectly (duplicate names, empty
//!   sequences, lookups of children that were never registered). Raised while
//!   building the tree, or by name lookups at any time.
//! - [`TickError`]: user code faulted while a tick was being evaluated. These
//!   are propagated untouched to whoever called `tick` on the root.
//!
//! A child reaching [`State::Failed`](crate::State::Failed) is neither; it is an
//! ordinary outcome reported through the parent's own state.

use crate::State;

/// Boxed error raised by user-supplied predicates and hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while configuring or querying a behavior tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A subbehavior with the same name is already registered on the parent.
    #[error("behavior '{parent}' already has a subbehavior named '{name}'")]
    DuplicateSubbehavior { parent: String, name: String },

    /// No subbehavior with this name is registered on the parent.
    #[error("behavior '{parent}' has no subbehavior named '{name}'")]
    UnknownSubbehavior { parent: String, name: String },

    /// A sequence was constructed without any steps.
    #[error("sequence '{name}' must have at least one step")]
    EmptySequence { name: String },

    /// A transition was declared out of a terminal state.
    #[error("behavior '{behavior}' cannot leave terminal state {state} by transition")]
    TerminalSource { behavior: String, state: State },
}

impl ConfigError {
    /// Returns `true` for a name lookup miss, as opposed to a wiring mistake.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(self, ConfigError::UnknownSubbehavior { .. })
    }
}

/// Errors that abort a tick.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A transition predicate returned an error.
    #[error("predicate '{label}' of behavior '{behavior}' failed: {source}")]
    Predicate {
        behavior: String,
        label: String,
        #[source]
        source: BoxError,
    },

    /// A lifecycle hook returned an error.
    #[error("{state} hook of behavior '{behavior}' failed: {source}")]
    Hook {
        behavior: String,
        state: State,
        #[source]
        source: BoxError,
    },

    /// A hook performed an invalid tree operation, e.g. a lookup miss.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TickError {
    /// Wraps an error raised inside the hook for `state` of `behavior`.
    pub fn hook(behavior: impl Into<String>, state: State, source: impl Into<BoxError>) -> Self {
        TickError::Hook {
            behavior: behavior.into(),
            state,
            source: source.into(),
        }
    }
}
