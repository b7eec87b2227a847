//! Drives one robot around a fixed set of waypoints, forever.

use behavior_tree::{Assignable, Behavior, ConfigError, Play, Sequence, State, TickError};

use crate::geometry::Point;
use crate::robot::Robot;
use crate::skills::{Move, MoveParams};
use crate::world::World;

/// Arbitrary points to move to.
pub const WAYPOINTS: [Point; 4] = [
    Point::new(0.0, 1.5),
    Point::new(2.0, 0.0),
    Point::new(0.0, 3.0),
    Point::new(-3.0, 0.0),
];

/// Test routine: a [`Sequence`] of [`Move`]s, restarted each time it completes.
///
/// The sequence is registered as the optional subbehavior [`Self::SEQUENCE`],
/// so a failed lap leaves the play itself running.
pub struct TestMoveSequence {
    play: Play<World>,
}

impl TestMoveSequence {
    pub const SEQUENCE: &'static str = "sequence";

    /// The standard continuous routine over [`WAYPOINTS`].
    pub fn new(robot: Robot) -> Result<Self, ConfigError> {
        Self::with_options(robot, &WAYPOINTS, MoveParams::default(), true)
    }

    pub fn with_options(
        robot: Robot,
        waypoints: &[Point],
        params: MoveParams,
        continuous: bool,
    ) -> Result<Self, ConfigError> {
        let steps = waypoints
            .iter()
            .map(|&target| {
                Move::with_params(target, params)
                    .map(|skill| Box::new(skill) as Box<dyn Assignable<World, Robot>>)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut sequence = Sequence::new("single robot sequence", steps)?;
        sequence.assign(robot);

        let mut play: Play<World> = Play::new("test move sequence", continuous)?;
        play.add_subbehavior(Box::new(sequence), Self::SEQUENCE, false)?;

        Ok(Self { play })
    }

    /// The waypoint sequence, for status polling.
    pub fn sequence(&self) -> Result<&dyn Behavior<World>, ConfigError> {
        self.play.subbehavior_with_name(Self::SEQUENCE)
    }

    pub fn play(&self) -> &Play<World> {
        &self.play
    }
}

impl Behavior<World> for TestMoveSequence {
    fn name(&self) -> &str {
        self.play.name()
    }

    fn state(&self) -> State {
        self.play.state()
    }

    fn tick(&mut self, world: &mut World) -> Result<(), TickError> {
        self.play.tick(world)
    }

    fn restart(&mut self) {
        self.play.restart()
    }

    fn cancel(&mut self) {
        self.play.cancel()
    }

    fn describe(&self, out: &mut String, depth: usize) {
        self.play.describe(out, depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_the_sequence_as_optional() {
        let play = TestMoveSequence::new(Robot::new(0)).unwrap();

        let entry = play.play().subbehaviors().iter().next().unwrap();
        assert_eq!(entry.name(), TestMoveSequence::SEQUENCE);
        assert!(!entry.required());
        assert!(play.play().is_continuous());
        assert_eq!(play.sequence().unwrap().state(), State::Start);
    }

    #[test]
    fn no_waypoints_is_a_configuration_error() {
        let err = TestMoveSequence::with_options(Robot::new(0), &[], MoveParams::default(), true)
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::EmptySequence { .. }));
    }

    #[test]
    fn describe_lists_every_waypoint() {
        let play = TestMoveSequence::new(Robot::new(0)).unwrap();
        let mut out = String::new();
        play.describe(&mut out, 0);

        assert_eq!(
            out,
            "test move sequence: start\n\
             \x20 single robot sequence: start\n\
             \x20   move (0, 1.5): start\n\
             \x20   move (2, 0): start\n\
             \x20   move (0, 3): start\n\
             \x20   move (-3, 0): start\n"
        );
    }
}
