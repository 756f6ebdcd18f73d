//! Reorder-window forwarding potential estimator.
//!
//! This crate replays a dynamic instruction stream through a bounded in-flight
//! window and estimates how many producer results could be forwarded straight
//! to a nearby consumer. It provides:
//! 1. **ISA view:** Instruction descriptors and the operand extractor.
//! 2. **Window:** The bounded, order-mutable window of in-flight entries.
//! 3. **Simulator:** Per-instruction matching, hazard filtering, relocation and backfill.
//! 4. **Statistics:** Run counters, the forwarding potential ratio and report output.
//! 5. **Trace input:** A JSON Lines trace reader for offline replay.

/// Common types (locations, tags, errors).
pub mod common;
/// Simulator configuration (defaults, profiles, validation).
pub mod config;
/// Instruction descriptors and the operand extractor.
pub mod isa;
/// Trace replay (JSON Lines reader).
pub mod sim;
/// Run counters and report output.
pub mod stats;
/// Forwarding window and the admission algorithm.
pub mod window;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Instruction descriptor consumed by the simulator.
pub use crate::isa::InstructionDescriptor;
/// Run counters read at shutdown.
pub use crate::stats::RunCounters;
/// Main simulator type; construct one per logical run.
pub use crate::window::ForwardingSimulator;
