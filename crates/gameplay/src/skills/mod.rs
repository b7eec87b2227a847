//! Leaf skills: single-robot behaviors that issue motion commands.

pub mod move_to;

pub use move_to::{Move, MoveParams};
