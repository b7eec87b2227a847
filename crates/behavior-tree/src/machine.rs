//! State machine driver shared by every behavior in this crate.
//!
//! A concrete behavior embeds a [`StateMachine`] and implements
//! [`StateHooks`] to attach work to lifecycle events. Its [`Behavior`]
//! implementation then forwards to [`tick`], [`restart`] and [`cancel`].
//!
//! # Tick protocol
//!
//! 1. Rules are scanned in declaration order; the first one whose `from`
//!    equals the current state and whose predicate holds fires.
//! 2. If a rule fired: `on_exit(old)`, state change, `on_enter(new)`.
//! 3. `execute(current)` runs for the (possibly new) state.
//!
//! At most one rule fires per tick, and terminal states never have rules.
//!
//! [`Behavior`]: crate::Behavior

use std::fmt::Write;

use crate::error::BoxError;
use crate::transition::{Predicate, Transition};
use crate::{ConfigError, State, TickError};

/// Lifecycle hooks of a behavior built on [`StateMachine`].
///
/// Every hook defaults to a no-op, so implementors override only what they
/// need. Most leaves implement just [`execute_running`](StateHooks::execute_running).
pub trait StateHooks<C>: Sized + Send {
    fn machine(&self) -> &StateMachine<Self, C>;

    fn machine_mut(&mut self) -> &mut StateMachine<Self, C>;

    /// Called after a transition into `state`.
    fn on_enter(&mut self, _state: State, _ctx: &mut C) -> Result<(), TickError> {
        Ok(())
    }

    /// Called before a transition out of `state`.
    fn on_exit(&mut self, _state: State, _ctx: &mut C) -> Result<(), TickError> {
        Ok(())
    }

    /// Work done every tick in `Running`.
    fn execute_running(&mut self, _ctx: &mut C) -> Result<(), TickError> {
        Ok(())
    }

    /// Work done every tick in `state`. Dispatches `Running` to
    /// [`execute_running`](StateHooks::execute_running); other states idle.
    fn execute(&mut self, state: State, ctx: &mut C) -> Result<(), TickError> {
        match state {
            State::Running => self.execute_running(ctx),
            _ => Ok(()),
        }
    }

    /// Clears behavior-specific progress. Called before the state resets.
    fn on_restart(&mut self) {}

    /// Stops in-flight work. Called before the state becomes `Cancelled`.
    fn on_cancel(&mut self) {}
}

/// Current state plus the ordered transition table of one behavior.
///
/// `T` is the owning behavior, which predicates receive by reference.
pub struct StateMachine<T, C> {
    name: String,
    state: State,
    ticks_in_state: u64,
    transitions: Vec<Transition<T, C>>,
}

impl<T, C> StateMachine<T, C> {
    /// Creates a machine in [`State::Start`] with an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: State::Start,
            ticks_in_state: 0,
            transitions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Number of completed ticks since the current state was entered.
    pub fn ticks_in_state(&self) -> u64 {
        self.ticks_in_state
    }

    pub fn transitions(&self) -> &[Transition<T, C>] {
        &self.transitions
    }

    /// Appends a rule with an infallible predicate.
    ///
    /// # Errors
    ///
    /// [`ConfigError::TerminalSource`] if `from` is a terminal state.
    pub fn add_transition<F>(
        &mut self,
        from: State,
        to: State,
        predicate: F,
        label: impl Into<String>,
    ) -> Result<(), ConfigError>
    where
        F: Fn(&T, &C) -> bool + Send + Sync + 'static,
    {
        self.push(from, to, Box::new(move |owner, ctx| Ok(predicate(owner, ctx))), label.into())
    }

    /// Appends a rule whose predicate may fail.
    ///
    /// A predicate error aborts the tick with [`TickError::Predicate`].
    pub fn add_fallible_transition<F>(
        &mut self,
        from: State,
        to: State,
        predicate: F,
        label: impl Into<String>,
    ) -> Result<(), ConfigError>
    where
        F: Fn(&T, &C) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        self.push(from, to, Box::new(predicate), label.into())
    }

    fn push(
        &mut self,
        from: State,
        to: State,
        predicate: Predicate<T, C>,
        label: String,
    ) -> Result<(), ConfigError> {
        if from.is_terminal() {
            return Err(ConfigError::TerminalSource {
                behavior: self.name.clone(),
                state: from,
            });
        }
        self.transitions.push(Transition::new(from, to, predicate, label));
        Ok(())
    }

    /// Index of the first rule that fires from the current state.
    fn select(&self, owner: &T, ctx: &C) -> Result<Option<usize>, TickError> {
        for (index, rule) in self.transitions.iter().enumerate() {
            if rule.from() == self.state && rule.fires(owner, ctx, &self.name)? {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    fn enter(&mut self, state: State) {
        self.state = state;
        self.ticks_in_state = 0;
    }

    /// Renders the transition table as a Graphviz digraph.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "digraph \"{}\" {{", self.name);
        let _ = writeln!(out, "  \"{}\" [shape=doublecircle];", self.state);
        for rule in &self.transitions {
            let _ = writeln!(
                out,
                "  \"{}\" -> \"{}\" [label=\"{}\"];",
                rule.from(),
                rule.to(),
                rule.label().replace('"', "\\\"")
            );
        }
        out.push_str("}\n");
        out
    }
}

impl<T, C> std::fmt::Debug for StateMachine<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("ticks_in_state", &self.ticks_in_state)
            .field("transitions", &self.transitions)
            .finish()
    }
}

/// Runs one tick of `owner` per the protocol in the module docs.
pub fn tick<C, T: StateHooks<C>>(owner: &mut T, ctx: &mut C) -> Result<(), TickError> {
    let fired = {
        let this: &T = owner;
        this.machine().select(this, ctx)?
    };

    if let Some(index) = fired {
        let machine = owner.machine();
        let rule = &machine.transitions[index];
        let (from, to) = (rule.from(), rule.to());
        tracing::debug!(
            behavior = machine.name(),
            %from,
            %to,
            label = rule.label(),
            "transition"
        );

        owner.on_exit(from, ctx)?;
        owner.machine_mut().enter(to);
        owner.on_enter(to, ctx)?;
    }

    let state = owner.machine().state();
    owner.execute(state, ctx)?;
    owner.machine_mut().ticks_in_state += 1;
    Ok(())
}

/// Clears progress and returns `owner` to [`State::Start`].
pub fn restart<C, T: StateHooks<C>>(owner: &mut T) {
    tracing::debug!(
        behavior = owner.machine().name(),
        from = %owner.machine().state(),
        "restart"
    );
    owner.on_restart();
    owner.machine_mut().enter(State::Start);
}

/// Moves a non-terminal `owner` to [`State::Cancelled`]. No-op otherwise.
pub fn cancel<C, T: StateHooks<C>>(owner: &mut T) {
    let state = owner.machine().state();
    if state.is_terminal() {
        return;
    }
    tracing::debug!(behavior = owner.machine().name(), from = %state, "cancel");
    owner.on_cancel();
    owner.machine_mut().enter(State::Cancelled);
}
