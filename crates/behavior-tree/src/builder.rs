//! Builder utilities for ergonomic tree construction.
//!
//! Shorthand constructors that box their result, plus common transition
//! predicates. Timeouts are expressed as ordinary predicates, e.g.
//!
//! ```rust,ignore
//! machine.add_transition(State::Running, State::Failed, after_ticks(120), "timed out")?;
//! ```

use crate::machine::StateHooks;
use crate::{Assignable, Behavior, ConfigError, Play, Sequence};

/// Creates a boxed single-resource sequence.
///
/// Shorthand for `Box::new(Sequence::new(name, steps)?)`.
pub fn sequence<C: 'static, R: Send + 'static>(
    name: impl Into<String>,
    steps: Vec<Box<dyn Assignable<C, R>>>,
) -> Result<Box<Sequence<C, R>>, ConfigError> {
    Sequence::new(name, steps).map(Box::new)
}

/// Creates a play owning `root` as a single non-required subbehavior.
pub fn play_with_root<C: 'static>(
    name: impl Into<String>,
    continuous: bool,
    root: Box<dyn Behavior<C>>,
    root_name: impl Into<String>,
) -> Result<Play<C>, ConfigError> {
    let mut play = Play::new(name, continuous)?;
    play.add_subbehavior(root, root_name, false)?;
    Ok(play)
}

/// Predicate that always holds.
#[inline]
pub fn immediately<T: 'static, C: 'static>() -> impl Fn(&T, &C) -> bool + Send + Sync + 'static {
    |_, _| true
}

/// Predicate that holds once the owner has spent `ticks` ticks in its current
/// state.
#[inline]
pub fn after_ticks<T, C>(ticks: u64) -> impl Fn(&T, &C) -> bool + Send + Sync + 'static
where
    T: StateHooks<C> + 'static,
    C: 'static,
{
    move |owner, _| owner.machine().ticks_in_state() >= ticks
}
