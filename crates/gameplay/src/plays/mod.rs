//! Plays: top-level behaviors ticked by the driver.

pub mod test_move_sequence;

pub use test_move_sequence::TestMoveSequence;
