//! Transition rules.

use crate::error::BoxError;
use crate::{State, TickError};

/// Predicate deciding whether a rule fires, given the owning behavior and the
/// tick context.
pub type Predicate<T, C> = Box<dyn Fn(&T, &C) -> Result<bool, BoxError> + Send + Sync>;

/// One `(from, to, predicate, label)` rule of a behavior's transition table.
pub struct Transition<T, C> {
    from: State,
    to: State,
    predicate: Predicate<T, C>,
    label: String,
}

impl<T, C> Transition<T, C> {
    pub(crate) fn new(from: State, to: State, predicate: Predicate<T, C>, label: String) -> Self {
        Self {
            from,
            to,
            predicate,
            label,
        }
    }

    pub fn from(&self) -> State {
        self.from
    }

    pub fn to(&self) -> State {
        self.to
    }

    /// Diagnostic label, shown in logs and graph output.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Evaluates the predicate. `behavior` names the owner for error reports.
    pub(crate) fn fires(&self, owner: &T, ctx: &C, behavior: &str) -> Result<bool, TickError> {
        (self.predicate)(owner, ctx).map_err(|source| TickError::Predicate {
            behavior: behavior.to_owned(),
            label: self.label.clone(),
            source,
        })
    }
}

impl<T, C> std::fmt::Debug for Transition<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
