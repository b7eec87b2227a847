//! Drive a robot to a fixed point.

use behavior_tree::builder::after_ticks;
use behavior_tree::machine::{self, StateHooks, StateMachine};
use behavior_tree::{Assignable, Behavior, ConfigError, State, TickError};

use crate::geometry::Point;
use crate::robot::Robot;
use crate::world::World;

/// Tuning shared by every [`Move`] in a play.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveParams {
    /// Distance from the target (meters) that counts as arrived.
    pub arrival_tolerance: f32,

    /// Fail if the target is not reached after this many running ticks.
    pub timeout_ticks: Option<u64>,
}

impl MoveParams {
    pub const DEFAULT_ARRIVAL_TOLERANCE: f32 = 0.05;
}

impl Default for MoveParams {
    fn default() -> Self {
        Self {
            arrival_tolerance: Self::DEFAULT_ARRIVAL_TOLERANCE,
            timeout_ticks: None,
        }
    }
}

/// Moves the assigned robot to `target` and completes on arrival.
///
/// Without a robot the skill keeps running and issues no commands.
pub struct Move {
    machine: StateMachine<Self, World>,
    target: Point,
    params: MoveParams,
    robot: Option<Robot>,
}

impl Move {
    pub fn new(target: Point) -> Result<Self, ConfigError> {
        Self::with_params(target, MoveParams::default())
    }

    pub fn with_params(target: Point, params: MoveParams) -> Result<Self, ConfigError> {
        let mut machine: StateMachine<Self, World> = StateMachine::new(format!("move {target}"));
        machine.add_transition(State::Start, State::Running, |_, _| true, "immediately")?;
        machine.add_transition(
            State::Running,
            State::Completed,
            |m: &Self, world: &World| m.arrived(world),
            "target reached",
        )?;
        if let Some(ticks) = params.timeout_ticks {
            machine.add_transition(
                State::Running,
                State::Failed,
                after_ticks::<Self, World>(ticks),
                "timed out",
            )?;
        }

        Ok(Self {
            machine,
            target,
            params,
            robot: None,
        })
    }

    pub fn target(&self) -> Point {
        self.target
    }

    fn arrived(&self, world: &World) -> bool {
        self.robot
            .as_ref()
            .and_then(|robot| robot.position(world))
            .is_some_and(|position| position.near_point(self.target, self.params.arrival_tolerance))
    }
}

impl StateHooks<World> for Move {
    fn machine(&self) -> &StateMachine<Self, World> {
        &self.machine
    }

    fn machine_mut(&mut self) -> &mut StateMachine<Self, World> {
        &mut self.machine
    }

    fn execute_running(&mut self, world: &mut World) -> Result<(), TickError> {
        let Some(robot) = &self.robot else {
            tracing::trace!(skill = self.machine.name(), "no robot assigned");
            return Ok(());
        };
        robot
            .move_to(world, self.target)
            .map_err(|err| TickError::hook(self.machine.name(), State::Running, err))
    }
}

impl Behavior<World> for Move {
    fn name(&self) -> &str {
        self.machine.name()
    }

    fn state(&self) -> State {
        self.machine.state()
    }

    fn tick(&mut self, world: &mut World) -> Result<(), TickError> {
        machine::tick(self, world)
    }

    fn restart(&mut self) {
        machine::restart::<World, _>(self)
    }

    fn cancel(&mut self) {
        machine::cancel::<World, _>(self)
    }
}

impl Assignable<World, Robot> for Move {
    fn assign(&mut self, robot: Robot) -> Option<Robot> {
        self.robot.replace(robot)
    }

    fn release(&mut self) -> Option<Robot> {
        self.robot.take()
    }

    fn resource(&self) -> Option<&Robot> {
        self.robot.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(1.0).with_robot(1, Point::ORIGIN)
    }

    #[test]
    fn commands_the_robot_until_it_arrives() {
        let mut world = world();
        let mut skill = Move::new(Point::new(0.0, 1.5)).unwrap();
        skill.assign(Robot::new(1));

        skill.tick(&mut world).unwrap();
        assert_eq!(skill.state(), State::Running);
        assert_eq!(world.commands()[0].target, Point::new(0.0, 1.5));

        world.step(1.0);
        skill.tick(&mut world).unwrap();
        assert_eq!(skill.state(), State::Running);

        world.step(1.0);
        skill.tick(&mut world).unwrap();
        assert!(skill.is_done_running());
    }

    #[test]
    fn idles_without_a_robot() {
        let mut world = world();
        let mut skill = Move::new(Point::new(2.0, 0.0)).unwrap();

        skill.tick(&mut world).unwrap();
        skill.tick(&mut world).unwrap();
        assert_eq!(skill.state(), State::Running);
        assert!(world.commands().is_empty());
    }

    #[test]
    fn times_out_when_configured() {
        let mut world = World::new(0.1).with_robot(1, Point::ORIGIN);
        let params = MoveParams {
            timeout_ticks: Some(3),
            ..MoveParams::default()
        };
        let mut skill = Move::with_params(Point::new(-3.0, 0.0), params).unwrap();
        skill.assign(Robot::new(1));

        for _ in 0..4 {
            skill.tick(&mut world).unwrap();
            world.step(0.1);
        }
        assert!(skill.has_failed());
    }

    #[test]
    fn unknown_robot_faults_the_tick() {
        let mut world = world();
        let mut skill = Move::new(Point::new(0.0, 3.0)).unwrap();
        skill.assign(Robot::new(42));

        let err = skill.tick(&mut world).unwrap_err();
        assert!(matches!(err, TickError::Hook { state: State::Running, .. }));
    }

    #[test]
    fn restart_keeps_the_robot() {
        let mut world = world();
        let mut skill = Move::new(Point::new(0.0, 3.0)).unwrap();
        skill.assign(Robot::new(1));
        skill.tick(&mut world).unwrap();

        skill.restart();
        assert_eq!(skill.state(), State::Start);
        assert_eq!(skill.resource(), Some(&Robot::new(1)));
    }
}
