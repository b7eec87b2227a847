//! Hierarchical behavior state machines for robot control loops.
//!
//! Every node of the tree is a small state machine with a closed set of
//! states ([`State`]), an ordered transition table evaluated once per tick,
//! and lifecycle hooks. Composites own their children exclusively and decide
//! which of them to tick each cycle.
//!
//! - **Bounded ticks**: a tick never blocks and fires at most one transition
//!   per behavior
//! - **Explicit restart**: terminal states are absorbing until `restart`
//! - **Owned resources**: a robot handle moves between behaviors by value, so
//!   only one behavior can drive it at a time
//!
//! # Architecture
//!
//! - [`Behavior`]: Core trait for all nodes; [`Assignable`] for nodes that
//!   drive a resource
//! - [`StateMachine`] + [`StateHooks`]: transition table and hook dispatch
//! - Composite nodes: [`Parallel`], [`Sequence`] (single resource, in order)
//! - [`Play`]: the externally ticked root, optionally continuous

pub mod behavior;
pub mod builder;
pub mod composite;
pub mod error;
pub mod machine;
pub mod play;
pub mod sequence;
pub mod state;
pub mod transition;

// Re-export core types for ergonomic API
pub use behavior::{Assignable, Behavior};
pub use composite::{Parallel, RestartPolicy, Subbehavior, Subbehaviors};
pub use error::{BoxError, ConfigError, TickError};
pub use machine::{StateHooks, StateMachine};
pub use play::Play;
pub use sequence::Sequence;
pub use state::State;
pub use transition::Transition;
