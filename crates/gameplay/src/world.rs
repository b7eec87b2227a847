//! Simulated field: robot positions and the commands issued each cycle.
//!
//! [`World`] is the context every gameplay behavior is ticked with. Skills
//! read robot positions from it and queue [`MotionCommand`]s into it; the
//! driver then advances the simulation with [`World::step`].

use std::collections::BTreeMap;

use crate::geometry::Point;

/// Errors raised when commanding the simulated field.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// No robot with this shell id is on the field.
    #[error("robot #{0} is not on the field")]
    UnknownRobot(u8),
}

/// Request to drive a robot to a point.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionCommand {
    pub shell_id: u8,
    pub target: Point,
}

/// Simulated robots plus the commands queued for the next step.
#[derive(Clone, Debug)]
pub struct World {
    robots: BTreeMap<u8, Point>,
    commands: Vec<MotionCommand>,
    max_speed: f32,
}

impl World {
    /// Creates an empty field whose robots drive at `max_speed` m/s.
    pub fn new(max_speed: f32) -> Self {
        Self {
            robots: BTreeMap::new(),
            commands: Vec::new(),
            max_speed,
        }
    }

    /// Places a robot (builder pattern).
    #[must_use]
    pub fn with_robot(mut self, shell_id: u8, position: Point) -> Self {
        self.place(shell_id, position);
        self
    }

    /// Places or teleports a robot.
    pub fn place(&mut self, shell_id: u8, position: Point) {
        self.robots.insert(shell_id, position);
    }

    pub fn position(&self, shell_id: u8) -> Option<Point> {
        self.robots.get(&shell_id).copied()
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Queues a command for the next [`step`](World::step).
    pub fn submit(&mut self, command: MotionCommand) -> Result<(), WorldError> {
        if !self.robots.contains_key(&command.shell_id) {
            return Err(WorldError::UnknownRobot(command.shell_id));
        }
        self.commands.push(command);
        Ok(())
    }

    /// Commands queued since the last step, oldest first.
    pub fn commands(&self) -> &[MotionCommand] {
        &self.commands
    }

    /// Advances the simulation by `dt` seconds and clears the command queue.
    ///
    /// Each commanded robot drives straight at its latest target, covering at
    /// most `max_speed * dt`, and stops exactly on the target once in reach.
    /// Robots without a command stay put.
    pub fn step(&mut self, dt: f32) {
        let reach = self.max_speed * dt;
        let mut latest: BTreeMap<u8, Point> = BTreeMap::new();
        for command in self.commands.drain(..) {
            latest.insert(command.shell_id, command.target);
        }

        for (shell_id, target) in latest {
            if let Some(position) = self.robots.get_mut(&shell_id) {
                let delta = target - *position;
                *position = if delta.magsq() <= reach * reach {
                    target
                } else {
                    *position + delta.normalized(reach)
                };
            }
        }
    }
}
