//! Trace replay utilities.
//!
//! Provides the JSON Lines trace reader and a driver that feeds a whole trace
//! through a [`ForwardingSimulator`](crate::window::ForwardingSimulator).

pub mod trace;

pub use trace::{TraceReader, replay};
