//! Core behavior traits.
//!
//! This module defines the [`Behavior`] trait, the contract shared by every
//! node of the tree, leaf or composite. The trait is generic over a context
//! type `C`, the blackboard a tick reads from and writes commands into.
//!
//! Behaviors that operate a single controlled resource (a robot) additionally
//! implement [`Assignable`]. The resource is moved in and out by value, so the
//! type system guarantees it is never held by two behaviors at once.

use crate::{State, TickError};

/// A node of the behavior tree.
pub trait Behavior<C>: Send {
    /// Diagnostic name of this behavior.
    fn name(&self) -> &str;

    /// Current state.
    fn state(&self) -> State;

    /// Advances this behavior by one control cycle.
    ///
    /// Evaluates the transition table, fires at most one transition, then runs
    /// the hook bound to the resulting state. Status is read back through
    /// [`state`](Behavior::state) rather than returned.
    ///
    /// # Errors
    ///
    /// Returns the first fault raised by a predicate or hook anywhere in the
    /// subtree. The tree is left as it was at the point of the fault.
    fn tick(&mut self, ctx: &mut C) -> Result<(), TickError>;

    /// Resets to [`State::Start`] and discards any progress.
    ///
    /// Safe to call from any state, including mid-run. Transition tables and
    /// children are kept.
    fn restart(&mut self);

    /// Moves a non-terminal behavior to [`State::Cancelled`].
    fn cancel(&mut self);

    /// `true` iff the behavior finished successfully.
    fn is_done_running(&self) -> bool {
        self.state().is_success()
    }

    /// `true` iff the behavior finished unsuccessfully.
    fn has_failed(&self) -> bool {
        self.state().is_failure()
    }

    /// `true` iff the behavior sits in any terminal state.
    fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    /// Appends an indented `name: state` line for this node (and, for
    /// composites, its children) to `out`.
    fn describe(&self, out: &mut String, depth: usize) {
        describe_line(out, depth, self.name(), self.state());
    }
}

/// A behavior that drives one exclusively owned resource.
pub trait Assignable<C, R>: Behavior<C> {
    /// Hands `resource` to this behavior, returning whatever it held before.
    fn assign(&mut self, resource: R) -> Option<R>;

    /// Takes the resource back, leaving the behavior without one.
    fn release(&mut self) -> Option<R>;

    /// The resource currently held, if any.
    fn resource(&self) -> Option<&R>;
}

/// Writes one line of a tree dump.
pub fn describe_line(out: &mut String, depth: usize, name: &str, state: State) {
    use std::fmt::Write;

    let _ = writeln!(out, "{:indent$}{name}: {state}", "", indent = depth * 2);
}

/// Blanket implementation for boxed behaviors.
///
/// This allows `Box<dyn Behavior<C>>` to also implement `Behavior<C>`,
/// enabling heterogeneous collections of nodes.
impl<C, B: Behavior<C> + ?Sized> Behavior<C> for Box<B> {
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn state(&self) -> State {
        (**self).state()
    }

    #[inline]
    fn tick(&mut self, ctx: &mut C) -> Result<(), TickError> {
        (**self).tick(ctx)
    }

    #[inline]
    fn restart(&mut self) {
        (**self).restart()
    }

    #[inline]
    fn cancel(&mut self) {
        (**self).cancel()
    }

    fn describe(&self, out: &mut String, depth: usize) {
        (**self).describe(out, depth)
    }
}

impl<C, R, A: Assignable<C, R> + ?Sized> Assignable<C, R> for Box<A> {
    #[inline]
    fn assign(&mut self, resource: R) -> Option<R> {
        (**self).assign(resource)
    }

    #[inline]
    fn release(&mut self) -> Option<R> {
        (**self).release()
    }

    #[inline]
    fn resource(&self) -> Option<&R> {
        (**self).resource()
    }
}
