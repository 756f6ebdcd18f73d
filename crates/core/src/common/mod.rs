//! Common types shared by the extractor, the window and the simulator.
//!
//! This module provides the small value types every other module speaks in:
//! 1. **Locations:** Register and memory identities an operand can name.
//! 2. **Tags:** Opaque instruction handles and per-admission entry tags.
//! 3. **Errors:** Configuration and trace errors.

/// Error types for configuration and trace input.
pub mod error;

/// Register ids, locations and operand values.
pub mod location;

/// Instruction handles and entry tags.
pub mod tag;

pub use error::{ConfigError, TraceError};
pub use location::{Location, OperandValue, RegId};
pub use tag::{EntryTag, InstId};
