//! Forwarding window.
//!
//! This module holds the in-flight instruction window and the simulator that
//! drives it. It provides:
//! 1. **Entries:** Per-instruction forwarding bookkeeping (`entry`).
//! 2. **Buffer:** The bounded, reorderable window itself (`buffer`).
//! 3. **Matching:** Producer lookup, hazard filtering and ranking (`matcher`).
//! 4. **Simulation:** Admission, binding, relocation and backfill (`simulator`).

/// Bounded, order-mutable window container.
pub mod buffer;

/// Window entry type.
pub mod entry;

/// Producer matching and hazard filtering.
pub mod matcher;

/// Admission and forwarding scheduler.
pub mod simulator;

pub use buffer::Window;
pub use entry::WindowEntry;
pub use matcher::{SourceMatch, barrier, filter_hazards, match_sources, rank};
pub use simulator::{Admission, ForwardingSimulator, SimSnapshot};
