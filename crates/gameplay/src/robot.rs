//! Handle to a controlled robot.
use std::fmt;

use crate::geometry::Point;
use crate::world::{MotionCommand, World, WorldError};

/// Exclusive handle to one robot on the field.
///
/// The handle is deliberately not `Clone`: whoever holds it is the only
/// behavior allowed to command the robot. Behavior trees pass it along by
/// value when control moves from one behavior to the next.
#[derive(Debug, PartialEq, Eq)]
pub struct Robot {
    shell_id: u8,
}

impl Robot {
    pub const fn new(shell_id: u8) -> Self {
        Self { shell_id }
    }

    pub const fn shell_id(&self) -> u8 {
        self.shell_id
    }

    /// Current position of this robot, if the world knows it.
    pub fn position(&self, world: &World) -> Option<Point> {
        world.position(self.shell_id)
    }

    /// Commands this robot to drive to `target`.
    pub fn move_to(&self, world: &mut World, target: Point) -> Result<(), WorldError> {
        world.submit(MotionCommand {
            shell_id: self.shell_id,
            target,
        })
    }
}

impl fmt::Display for Robot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "robot #{}", self.shell_id)
    }
}
