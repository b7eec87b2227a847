//! Robot gameplay built on `behavior_tree`.
//!
//! This crate supplies the pieces the behavior engine treats as black boxes:
//! field geometry, the robot handle, a simulated [`World`] used as the tick
//! context, leaf skills, plays, and the fixed-rate [`Driver`].

pub mod config;
pub mod driver;
pub mod geometry;
pub mod plays;
pub mod robot;
pub mod skills;
pub mod world;

pub use config::DriverConfig;
pub use driver::{Driver, Status};
pub use geometry::Point;
pub use plays::TestMoveSequence;
pub use robot::Robot;
pub use skills::{Move, MoveParams};
pub use world::{MotionCommand, World, WorldError};
