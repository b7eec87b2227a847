//! Fixed-step driver: one play tick, then one simulation step.
//!
//! Timing is left to the caller (the binary uses a tokio interval), so the
//! driver itself stays synchronous and deterministic.

use std::time::Duration;

use behavior_tree::{Behavior, ConfigError, State, TickError};

use crate::config::DriverConfig;
use crate::geometry::Point;
use crate::plays::TestMoveSequence;
use crate::plays::test_move_sequence::WAYPOINTS;
use crate::robot::Robot;
use crate::world::World;

/// Outcome of one driver step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Finished(State),
}

/// Owns the play and the simulated world and advances both in lockstep.
pub struct Driver {
    play: TestMoveSequence,
    world: World,
    dt: f32,
    ticks: u64,
    laps: u64,
    sequence_state: State,
}

impl Driver {
    pub fn new(play: TestMoveSequence, world: World, period: Duration) -> Self {
        Self {
            play,
            world,
            dt: period.as_secs_f32(),
            ticks: 0,
            laps: 0,
            sequence_state: State::Start,
        }
    }

    /// Builds the standard waypoint play with its robot at the origin.
    pub fn from_config(config: &DriverConfig) -> Result<Self, ConfigError> {
        let world = World::new(config.sim.max_speed).with_robot(config.robot_id, Point::ORIGIN);
        let play = TestMoveSequence::with_options(
            Robot::new(config.robot_id),
            &WAYPOINTS,
            config.motion,
            config.continuous,
        )?;
        Ok(Self::new(play, world, config.loop_config.period()))
    }

    /// Ticks the play once, then advances the world by one period.
    pub fn step(&mut self) -> Result<Status, TickError> {
        self.play.tick(&mut self.world)?;
        self.world.step(self.dt);
        self.ticks += 1;

        let state = self.play.sequence()?.state();
        if state != self.sequence_state {
            match state {
                State::Completed => {
                    self.laps += 1;
                    tracing::info!(tick = self.ticks, lap = self.laps, "waypoint sequence completed");
                    tracing::debug!(tree = %self.describe(), "tree at lap end");
                }
                State::Failed | State::Cancelled => {
                    tracing::warn!(tick = self.ticks, %state, "waypoint sequence did not complete");
                }
                _ => {}
            }
            self.sequence_state = state;
        }

        let play_state = self.play.state();
        if play_state.is_terminal() {
            tracing::info!(tick = self.ticks, state = %play_state, "play finished");
            return Ok(Status::Finished(play_state));
        }
        Ok(Status::Running)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of times the waypoint sequence has completed.
    pub fn laps(&self) -> u64 {
        self.laps
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn play(&self) -> &TestMoveSequence {
        &self.play
    }

    /// Indented dump of the whole tree with current states.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.play.describe(&mut out, 0);
        out
    }
}
