//! States a behavior can occupy.

/// The closed set of states every behavior moves through.
///
/// # Lifecycle
///
/// A behavior is created in `Start`, is driven into `Running` by its own
/// transition table, and eventually settles in one of the terminal states.
/// Terminal states are absorbing: only an explicit restart leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum State {
    /// Created or restarted, not yet running.
    Start,

    /// Actively doing work; the running hook executes every tick.
    Running,

    /// Finished successfully.
    Completed,

    /// Finished unsuccessfully.
    Failed,

    /// Stopped from the outside before finishing.
    Cancelled,
}

impl State {
    /// Returns `true` for states that have no outgoing transitions.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, State::Completed | State::Failed | State::Cancelled)
    }

    /// Returns `true` if this is the terminal success state.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, State::Completed)
    }

    /// Returns `true` if this is a terminal state other than success.
    ///
    /// Cancellation counts as failure for anyone waiting on the outcome.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, State::Failed | State::Cancelled)
    }

    /// Snake-case name, as used in logs and graph output.
    #[inline]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}
