//! One-resource-at-a-time sequence.
//!
//! A [`Sequence`] runs its steps strictly in order against a single resource
//! (typically one robot). Exactly one step is active at a time and only the
//! active step holds the resource; when it completes, the resource is moved to
//! the next step within the same tick.

use crate::machine::{self, StateHooks, StateMachine};
use crate::{Assignable, Behavior, ConfigError, State, Subbehaviors, TickError};

/// Runs resource-driven steps one after another.
///
/// # Semantics
///
/// - The first running tick activates step 0, hands it the resource and ticks it
/// - Each later tick ticks the active step; if that step has just completed and
///   is not the last, the resource moves to the next step, which is ticked in
///   the same cycle. The cursor advances at most one step per tick
/// - The tick after the last step completes, the sequence **completes**
/// - The tick after any step fails (or is cancelled), the sequence **fails**;
///   later steps are never activated
pub struct Sequence<C: 'static, R: Send + 'static> {
    machine: StateMachine<Self, C>,
    steps: Subbehaviors<C, dyn Assignable<C, R>>,
    cursor: Option<usize>,
    resource: Option<R>,
}

impl<C: 'static, R: Send + 'static> Sequence<C, R> {
    /// Creates a sequence over `steps`, which are registered as required
    /// subbehaviors named by position.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptySequence`] if `steps` is empty.
    pub fn new(
        name: impl Into<String>,
        steps: Vec<Box<dyn Assignable<C, R>>>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if steps.is_empty() {
            return Err(ConfigError::EmptySequence { name });
        }

        let mut container: Subbehaviors<C, dyn Assignable<C, R>> = Subbehaviors::new(name.clone());
        for (index, step) in steps.into_iter().enumerate() {
            container.add(step, index.to_string(), true)?;
        }

        let mut machine: StateMachine<Self, C> = StateMachine::new(name);
        machine.add_transition(State::Start, State::Running, |_, _| true, "immediately")?;
        machine.add_transition(
            State::Running,
            State::Failed,
            |s: &Self, _| s.active().is_some_and(|step| step.has_failed()),
            "active step failed",
        )?;
        machine.add_transition(
            State::Running,
            State::Completed,
            |s: &Self, _| s.is_exhausted(),
            "all steps completed",
        )?;

        Ok(Self {
            machine,
            steps: container,
            cursor: None,
            resource: None,
        })
    }

    /// Index of the active step; `None` before the first running tick and
    /// after a restart.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &Subbehaviors<C, dyn Assignable<C, R>> {
        &self.steps
    }

    pub fn subbehavior_with_name(&self, name: &str) -> Result<&dyn Assignable<C, R>, ConfigError> {
        self.steps.get(name)
    }

    /// The step currently holding the resource.
    pub fn active(&self) -> Option<&dyn Assignable<C, R>> {
        self.cursor.and_then(|index| self.steps.nth(index))
    }

    fn is_exhausted(&self) -> bool {
        self.cursor == Some(self.steps.len() - 1)
            && self.active().is_some_and(|step| step.is_done_running())
    }

    /// Index of the step holding the resource while running.
    fn holder(&self) -> Option<usize> {
        match self.machine.state() {
            State::Running => self.cursor,
            _ => None,
        }
    }

    /// Makes `index` the active step, moving the resource to it.
    fn activate(&mut self, index: usize) {
        let resource = match self.cursor {
            Some(previous) => self.steps.nth_mut(previous).and_then(|step| step.release()),
            None => self.resource.take(),
        };
        self.cursor = Some(index);

        tracing::debug!(
            sequence = self.machine.name(),
            step = index,
            with_resource = resource.is_some(),
            "activating step"
        );

        if let (Some(resource), Some(step)) = (resource, self.steps.nth_mut(index)) {
            if let Some(stale) = step.assign(resource) {
                tracing::warn!(
                    sequence = self.machine.name(),
                    step = index,
                    "step already held a resource; keeping it on the sequence"
                );
                self.resource = Some(stale);
            }
        }
    }

    /// Pulls the resource back from the active step.
    fn reclaim(&mut self) {
        if let Some(step) = self.cursor.and_then(|index| self.steps.nth_mut(index)) {
            if let Some(resource) = step.release() {
                self.resource = Some(resource);
            }
        }
    }
}

impl<C: 'static, R: Send + 'static> StateHooks<C> for Sequence<C, R> {
    fn machine(&self) -> &StateMachine<Self, C> {
        &self.machine
    }

    fn machine_mut(&mut self) -> &mut StateMachine<Self, C> {
        &mut self.machine
    }

    fn on_enter(&mut self, state: State, _ctx: &mut C) -> Result<(), TickError> {
        if state.is_terminal() {
            self.reclaim();
        }
        Ok(())
    }

    fn execute_running(&mut self, ctx: &mut C) -> Result<(), TickError> {
        let index = match self.cursor {
            Some(index) => index,
            None => {
                self.activate(0);
                0
            }
        };

        let count = self.steps.len();
        let Some(step) = self.steps.nth_mut(index) else {
            return Ok(());
        };
        step.tick(ctx)?;

        let next = index + 1;
        if step.is_done_running() && next < count {
            self.activate(next);
            if let Some(step) = self.steps.nth_mut(next) {
                step.tick(ctx)?;
            }
        }
        Ok(())
    }

    fn on_restart(&mut self) {
        self.reclaim();
        self.cursor = None;
        self.steps.restart_all();
    }

    fn on_cancel(&mut self) {
        if let Some(step) = self.cursor.and_then(|index| self.steps.nth_mut(index)) {
            step.cancel();
        }
        self.reclaim();
    }
}

impl<C: 'static, R: Send + 'static> Behavior<C> for Sequence<C, R> {
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
        self.steps.describe(out, depth);
    }
}

impl<C: 'static, R: Send + 'static> Assignable<C, R> for Sequence<C, R> {
    /// While running, the resource goes straight to the active step;
    /// otherwise it is kept until the next activation.
    fn assign(&mut self, resource: R) -> Option<R> {
        match self.holder().and_then(|index| self.steps.nth_mut(index)) {
            Some(step) => step.assign(resource),
            None => self.resource.replace(resource),
        }
    }

    fn release(&mut self) -> Option<R> {
        match self.holder().and_then(|index| self.steps.nth_mut(index)) {
            Some(step) => step.release(),
            None => self.resource.take(),
        }
    }

    fn resource(&self) -> Option<&R> {
        match self.holder().and_then(|index| self.steps.nth(index)) {
            Some(step) => step.resource(),
            None => self.resource.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unclonable stand-in for a robot.
    #[derive(Debug, PartialEq, Eq)]
    struct Token(u8);

    /// One entry per leaf tick: (tick number, step name, held the token).
    #[derive(Default)]
    struct TestContext {
        now: u32,
        ticks: Vec<(u32, &'static str, bool)>,
    }

    /// Completes (or fails) after `ticks` ticks of its own.
    struct Step {
        name: &'static str,
        state: State,
        ticks: u32,
        elapsed: u32,
        outcome: State,
        token: Option<Token>,
    }

    impl Step {
        fn boxed(name: &'static str, ticks: u32) -> Box<dyn Assignable<TestContext, Token>> {
            Self::with_outcome(name, ticks, State::Completed)
        }

        fn with_outcome(
            name: &'static str,
            ticks: u32,
            outcome: State,
        ) -> Box<dyn Assignable<TestContext, Token>> {
            Box::new(Self {
                name,
                state: State::Start,
                ticks,
                elapsed: 0,
                outcome,
                token: None,
            })
        }
    }

    impl Behavior<TestContext> for Step {
        fn name(&self) -> &str {
            self.name
        }

        fn state(&self) -> State {
            self.state
        }

        fn tick(&mut self, ctx: &mut TestContext) -> Result<(), TickError> {
            ctx.ticks.push((ctx.now, self.name, self.token.is_some()));
            if self.state.is_terminal() {
                return Ok(());
            }
            self.elapsed += 1;
            self.state = if self.elapsed >= self.ticks {
                self.outcome
            } else {
                State::Running
            };
            Ok(())
        }

        fn restart(&mut self) {
            self.state = State::Start;
            self.elapsed = 0;
        }

        fn cancel(&mut self) {
            if !self.state.is_terminal() {
                self.state = State::Cancelled;
            }
        }
    }

    impl Assignable<TestContext, Token> for Step {
        fn assign(&mut self, token: Token) -> Option<Token> {
            self.token.replace(token)
        }

        fn release(&mut self) -> Option<Token> {
            self.token.take()
        }

        fn resource(&self) -> Option<&Token> {
            self.token.as_ref()
        }
    }

    fn run(seq: &mut Sequence<TestContext, Token>, ctx: &mut TestContext) {
        ctx.now += 1;
        seq.tick(ctx).unwrap();
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let err = Sequence::<TestContext, Token>::new("nothing", Vec::new())
            .err()
            .unwrap();
        assert_eq!(err, ConfigError::EmptySequence { name: "nothing".into() });
    }

    #[test]
    fn resource_follows_the_active_step() {
        let mut seq = Sequence::new("ab", vec![Step::boxed("a", 2), Step::boxed("b", 2)]).unwrap();
        seq.assign(Token(7));

        let mut ctx = TestContext::default();
        run(&mut seq, &mut ctx); // a running
        run(&mut seq, &mut ctx); // a completes, b starts in the same tick
        assert_eq!(seq.cursor(), Some(1));
        run(&mut seq, &mut ctx); // b completes
        assert!(!seq.is_done_running());
        run(&mut seq, &mut ctx); // sequence completes
        assert!(seq.is_done_running());

        assert_eq!(
            ctx.ticks,
            vec![(1, "a", true), (2, "a", true), (2, "b", true), (3, "b", true)]
        );
        // Reclaimed once finished.
        assert_eq!(seq.resource(), Some(&Token(7)));
    }

    #[test]
    fn completes_exactly_one_tick_after_last_step() {
        let mut seq = Sequence::new("ab", vec![Step::boxed("a", 1), Step::boxed("b", 1)]).unwrap();

        let mut ctx = TestContext::default();
        run(&mut seq, &mut ctx);
        let b = seq.subbehavior_with_name("1").unwrap();
        assert!(b.is_done_running());
        assert!(!seq.is_done_running());

        run(&mut seq, &mut ctx);
        assert!(seq.is_done_running());
    }

    #[test]
    fn failing_step_aborts_the_rest() {
        let mut seq = Sequence::new(
            "abc",
            vec![
                Step::boxed("a", 1),
                Step::with_outcome("b", 1, State::Failed),
                Step::boxed("c", 1),
            ],
        )
        .unwrap();
        seq.assign(Token(1));

        let mut ctx = TestContext::default();
        for _ in 0..5 {
            run(&mut seq, &mut ctx);
        }

        assert!(seq.has_failed());
        assert!(ctx.ticks.iter().all(|(_, name, _)| *name != "c"));
        let c = seq.subbehavior_with_name("2").unwrap();
        assert_eq!(c.state(), State::Start);
        assert!(c.resource().is_none());
        assert_eq!(seq.resource(), Some(&Token(1)));
    }

    #[test]
    fn restart_replays_the_same_trajectory() {
        let mut seq = Sequence::new(
            "abc",
            vec![Step::boxed("a", 2), Step::boxed("b", 1), Step::boxed("c", 3)],
        )
        .unwrap();
        seq.assign(Token(3));

        let trajectory = |seq: &mut Sequence<TestContext, Token>| {
            let mut ctx = TestContext::default();
            let mut states = Vec::new();
            for _ in 0..8 {
                run(seq, &mut ctx);
                states.push((seq.state(), seq.cursor()));
            }
            (states, ctx.ticks)
        };

        let first = trajectory(&mut seq);
        assert!(seq.is_done_running());

        seq.restart();
        assert_eq!(seq.state(), State::Start);
        assert_eq!(seq.cursor(), None);
        assert!(seq.steps().iter().all(|entry| entry.behavior().state() == State::Start));

        let second = trajectory(&mut seq);
        assert_eq!(first, second);
    }

    #[test]
    fn restart_mid_run_reclaims_the_resource() {
        let mut seq = Sequence::new("ab", vec![Step::boxed("a", 5), Step::boxed("b", 1)]).unwrap();
        seq.assign(Token(9));

        let mut ctx = TestContext::default();
        run(&mut seq, &mut ctx);
        assert!(seq.active().and_then(|a| a.resource()).is_some());

        seq.restart();
        assert_eq!(seq.release(), Some(Token(9)));
        assert!(seq.steps().iter().all(|entry| entry.behavior().resource().is_none()));
    }

    #[test]
    fn assign_while_running_swaps_on_the_active_step() {
        let mut seq = Sequence::new("a", vec![Step::boxed("a", 5)]).unwrap();
        seq.assign(Token(1));

        let mut ctx = TestContext::default();
        run(&mut seq, &mut ctx);

        assert_eq!(seq.assign(Token(2)), Some(Token(1)));
        assert_eq!(seq.active().and_then(|a| a.resource()), Some(&Token(2)));
    }

    #[test]
    fn cancel_stops_the_active_step() {
        let mut seq = Sequence::new("ab", vec![Step::boxed("a", 5), Step::boxed("b", 1)]).unwrap();
        seq.assign(Token(4));

        let mut ctx = TestContext::default();
        run(&mut seq, &mut ctx);
        seq.cancel();

        assert_eq!(seq.state(), State::Cancelled);
        assert!(seq.has_failed());
        assert_eq!(seq.active().map(|a| a.state()), Some(State::Cancelled));
        assert_eq!(seq.resource(), Some(&Token(4)));
    }
}
