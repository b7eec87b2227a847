//! Composite behaviors.
//!
//! A composite owns named child behaviors ("subbehaviors") and decides which
//! of them to tick each cycle. This module provides the shared container,
//! [`Subbehaviors`], and the simplest scheduling policy built on it,
//! [`Parallel`]. The one-at-a-time policy lives in [`crate::sequence`].

use std::marker::PhantomData;

use crate::machine::{self, StateHooks, StateMachine};
use crate::{Behavior, ConfigError, State, TickError};

/// What a composite does with a child that has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestartPolicy {
    /// Leave the child in its terminal state.
    #[default]
    Never,

    /// Restart the child once it completes successfully.
    WhenDone,

    /// Restart the child once it reaches any terminal state.
    WhenTerminal,
}

impl RestartPolicy {
    fn wants_restart(self, state: State) -> bool {
        match self {
            RestartPolicy::Never => false,
            RestartPolicy::WhenDone => state.is_success(),
            RestartPolicy::WhenTerminal => state.is_terminal(),
        }
    }
}

/// A named child and the parent's policy towards it.
pub struct Subbehavior<B: ?Sized> {
    name: String,
    required: bool,
    policy: RestartPolicy,
    behavior: Box<B>,
}

impl<B: ?Sized> Subbehavior<B> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the parent fails when this child fails.
    pub fn required(&self) -> bool {
        self.required
    }

    pub fn policy(&self) -> RestartPolicy {
        self.policy
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut B {
        &mut self.behavior
    }
}

/// Insertion-ordered set of uniquely named children.
///
/// `C` is the tick context, `B` the child type (`dyn Behavior<C>` unless a
/// composite needs a richer interface from its children).
pub struct Subbehaviors<C, B: ?Sized = dyn Behavior<C>> {
    owner: String,
    entries: Vec<Subbehavior<B>>,
    _context: PhantomData<fn(&mut C)>,
}

impl<C, B: Behavior<C> + ?Sized> Subbehaviors<C, B> {
    /// Creates an empty container. `owner` names the parent in errors.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            entries: Vec::new(),
            _context: PhantomData,
        }
    }

    /// Registers `behavior` under `name` with [`RestartPolicy::Never`].
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicateSubbehavior`] if `name` is taken.
    pub fn add(
        &mut self,
        behavior: Box<B>,
        name: impl Into<String>,
        required: bool,
    ) -> Result<(), ConfigError> {
        self.add_with_policy(behavior, name, required, RestartPolicy::Never)
    }

    pub fn add_with_policy(
        &mut self,
        behavior: Box<B>,
        name: impl Into<String>,
        required: bool,
        policy: RestartPolicy,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(ConfigError::DuplicateSubbehavior {
                parent: self.owner.clone(),
                name,
            });
        }
        self.entries.push(Subbehavior {
            name,
            required,
            policy,
            behavior,
        });
        Ok(())
    }

    /// Looks a child up by name.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownSubbehavior`] if nothing is registered under
    /// `name`. A registered child is returned whatever its state.
    pub fn get(&self, name: &str) -> Result<&B, ConfigError> {
        self.position(name)
            .map(|index| &*self.entries[index].behavior)
            .ok_or_else(|| self.unknown(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut B, ConfigError> {
        match self.position(name) {
            Some(index) => Ok(&mut *self.entries[index].behavior),
            None => Err(self.unknown(name)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Unregisters a child and hands it back to the caller.
    pub fn remove(&mut self, name: &str) -> Result<Box<B>, ConfigError> {
        match self.position(name) {
            Some(index) => Ok(self.entries.remove(index).behavior),
            None => Err(self.unknown(name)),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Child at insertion position `index`.
    pub fn nth(&self, index: usize) -> Option<&B> {
        self.entries.get(index).map(|entry| &*entry.behavior)
    }

    pub fn nth_mut(&mut self, index: usize) -> Option<&mut B> {
        self.entries.get_mut(index).map(|entry| &mut *entry.behavior)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subbehavior<B>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name of the first required child that has failed, if any.
    pub fn first_failed_required(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.required && entry.behavior.has_failed())
            .map(|entry| entry.name.as_str())
    }

    /// `true` if every child is in a terminal state (vacuously for none).
    pub fn all_terminal(&self) -> bool {
        self.entries.iter().all(|entry| entry.behavior.is_terminal())
    }

    /// Applies each child's restart policy, then ticks every child that is
    /// not terminal.
    pub fn tick_all(&mut self, ctx: &mut C) -> Result<(), TickError> {
        for entry in &mut self.entries {
            if entry.policy.wants_restart(entry.behavior.state()) {
                tracing::debug!(
                    parent = %self.owner,
                    child = %entry.name,
                    state = %entry.behavior.state(),
                    "auto-restarting subbehavior"
                );
                entry.behavior.restart();
            }
            if !entry.behavior.is_terminal() {
                entry.behavior.tick(ctx)?;
            }
        }
        Ok(())
    }

    pub fn restart_all(&mut self) {
        for entry in &mut self.entries {
            entry.behavior.restart();
        }
    }

    /// Cancels every child that has not finished.
    pub fn cancel_running(&mut self) {
        for entry in &mut self.entries {
            entry.behavior.cancel();
        }
    }

    /// Writes every child one level below `depth`.
    pub fn describe(&self, out: &mut String, depth: usize) {
        for entry in &self.entries {
            entry.behavior.describe(out, depth + 1);
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    fn unknown(&self, name: &str) -> ConfigError {
        ConfigError::UnknownSubbehavior {
            parent: self.owner.clone(),
            name: name.to_owned(),
        }
    }
}

/// Ticks all children every cycle.
///
/// # Semantics
///
/// - If a required child fails, the parallel **fails** and cancels the rest
/// - Once every child has finished and no required child failed, it **completes**
/// - Optional children may fail without affecting the outcome
pub struct Parallel<C: 'static> {
    machine: StateMachine<Self, C>,
    subbehaviors: Subbehaviors<C>,
}

impl<C: 'static> Parallel<C> {
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        let mut machine: StateMachine<Self, C> = StateMachine::new(name.clone());
        machine.add_transition(State::Start, State::Running, |_, _| true, "immediately")?;
        machine.add_transition(
            State::Running,
            State::Failed,
            |p: &Self, _| p.subbehaviors.first_failed_required().is_some(),
            "required subbehavior failed",
        )?;
        machine.add_transition(
            State::Running,
            State::Completed,
            |p: &Self, _| p.subbehaviors.all_terminal(),
            "all subbehaviors finished",
        )?;

        Ok(Self {
            machine,
            subbehaviors: Subbehaviors::new(name),
        })
    }

    pub fn add_subbehavior(
        &mut self,
        behavior: Box<dyn Behavior<C>>,
        name: impl Into<String>,
        required: bool,
    ) -> Result<(), ConfigError> {
        self.subbehaviors.add(behavior, name, required)
    }

    pub fn subbehavior_with_name(&self, name: &str) -> Result<&dyn Behavior<C>, ConfigError> {
        self.subbehaviors.get(name)
    }

    pub fn subbehaviors(&self) -> &Subbehaviors<C> {
        &self.subbehaviors
    }
}

impl<C: 'static> StateHooks<C> for Parallel<C> {
    fn machine(&self) -> &StateMachine<Self, C> {
        &self.machine
    }

    fn machine_mut(&mut self) -> &mut StateMachine<Self, C> {
        &mut self.machine
    }

    fn on_enter(&mut self, state: State, _ctx: &mut C) -> Result<(), TickError> {
        if state == State::Failed {
            self.subbehaviors.cancel_running();
        }
        Ok(())
    }

    fn execute_running(&mut self, ctx: &mut C) -> Result<(), TickError> {
        self.subbehaviors.tick_all(ctx)
    }

    fn on_restart(&mut self) {
        self.subbehaviors.restart_all();
    }

    fn on_cancel(&mut self) {
        self.subbehaviors.cancel_running();
    }
}

impl<C: 'static> Behavior<C> for Parallel<C> {
    fn name(&self) -> &str {
        self.machine.name()
    }

    fn state(&self) -> State {
        self.machine.state()
    }

    fn tick(&mut self, ctx: &mut C) -> Result<(), TickError> {
        machine::tick(self, ctx)
    }

    fn restart(&mut self) {
        machine::restart::<C, _>(self)
    }

    fn cancel(&mut self) {
        machine::cancel::<C, _>(self)
    }

    fn describe(&self, out: &mut String, depth: usize) {
        crate::behavior::describe_line(out, depth, self.name(), self.state());
        self.subbehaviors.describe(out, depth);
    }
}
