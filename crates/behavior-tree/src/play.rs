//! Top-level orchestrator.
//!
//! A [`Play`] is the root of a behavior tree: the driver ticks it once per
//! control cycle and it ticks its subbehaviors in turn. A *continuous* play
//! never finishes on its own; whenever one of its subbehaviors completes, the
//! play restarts it before the next tick, so a demonstration routine loops
//! forever.

use crate::composite::RestartPolicy;
use crate::machine::{self, StateHooks, StateMachine};
use crate::{Behavior, ConfigError, State, Subbehaviors, TickError};

/// Externally ticked root behavior.
pub struct Play<C: 'static> {
    machine: StateMachine<Self, C>,
    subbehaviors: Subbehaviors<C>,
    continuous: bool,
}

impl<C: 'static> Play<C> {
    /// Creates a play with the bootstrap transition `start → running`.
    ///
    /// Every play fails once a required subbehavior fails. A play that is not
    /// `continuous` also completes once all its subbehaviors have finished.
    pub fn new(name: impl Into<String>, continuous: bool) -> Result<Self, ConfigError> {
        let name = name.into();
        let mut machine: StateMachine<Self, C> = StateMachine::new(name.clone());
        machine.add_transition(State::Start, State::Running, |_, _| true, "immediately")?;
        machine.add_transition(
            State::Running,
            State::Failed,
            |p: &Self, _| p.subbehaviors.first_failed_required().is_some(),
            "required subbehavior failed",
        )?;
        if !continuous {
            machine.add_transition(
                State::Running,
                State::Completed,
                |p: &Self, _| !p.subbehaviors.is_empty() && p.subbehaviors.all_terminal(),
                "all subbehaviors finished",
            )?;
        }

        Ok(Self {
            machine,
            subbehaviors: Subbehaviors::new(name),
            continuous,
        })
    }

    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    /// Registers a child. In a continuous play the child is restarted each
    /// time it completes.
    pub fn add_subbehavior(
        &mut self,
        behavior: Box<dyn Behavior<C>>,
        name: impl Into<String>,
        required: bool,
    ) -> Result<(), ConfigError> {
        let policy = if self.continuous {
            RestartPolicy::WhenDone
        } else {
            RestartPolicy::Never
        };
        self.subbehaviors
            .add_with_policy(behavior, name, required, policy)
    }

    /// Registers a child with an explicit restart policy.
    pub fn add_subbehavior_with_policy(
        &mut self,
        behavior: Box<dyn Behavior<C>>,
        name: impl Into<String>,
        required: bool,
        policy: RestartPolicy,
    ) -> Result<(), ConfigError> {
        self.subbehaviors
            .add_with_policy(behavior, name, required, policy)
    }

    /// # Errors
    ///
    /// [`ConfigError::UnknownSubbehavior`] if no child has this name.
    pub fn subbehavior_with_name(&self, name: &str) -> Result<&dyn Behavior<C>, ConfigError> {
        self.subbehaviors.get(name)
    }

    pub fn subbehavior_with_name_mut(
        &mut self,
        name: &str,
    ) -> Result<&mut dyn Behavior<C>, ConfigError> {
        self.subbehaviors.get_mut(name).map(|b| b as &mut dyn Behavior<C>)
    }

    pub fn has_subbehavior_with_name(&self, name: &str) -> bool {
        self.subbehaviors.contains(name)
    }

    pub fn remove_subbehavior(&mut self, name: &str) -> Result<Box<dyn Behavior<C>>, ConfigError> {
        self.subbehaviors.remove(name)
    }

    pub fn remove_all_subbehaviors(&mut self) {
        self.subbehaviors.clear();
    }

    pub fn subbehaviors(&self) -> &Subbehaviors<C> {
        &self.subbehaviors
    }

    /// Appends a rule to the play's own transition table.
    pub fn add_transition<F>(
        &mut self,
        from: State,
        to: State,
        predicate: F,
        label: impl Into<String>,
    ) -> Result<(), ConfigError>
    where
        F: Fn(&Self, &C) -> bool + Send + Sync + 'static,
    {
        self.machine.add_transition(from, to, predicate, label)
    }

    /// Graphviz rendering of the play's own transition table.
    pub fn to_dot(&self) -> String {
        self.machine.to_dot()
    }
}

impl<C: 'static> StateHooks<C> for Play<C> {
    fn machine(&self) -> &StateMachine<Self, C> {
        &self.machine
    }

    fn machine_mut(&mut self) -> &mut StateMachine<Self, C> {
        &mut self.machine
    }

    fn on_enter(&mut self, state: State, _ctx: &mut C) -> Result<(), TickError> {
        if state == State::Failed {
            if let Some(name) = self.subbehaviors.first_failed_required() {
                tracing::warn!(play = self.machine.name(), subbehavior = name, "required subbehavior failed");
            }
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

impl<C: 'static> Behavior<C> for Play<C> {
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
