//! Instruction view consumed by the simulator.
//!
//! The trace host decodes instructions; this module only normalizes what the
//! host reports. It provides:
//! 1. **Descriptors:** Opaque identity, category and raw operand list per instruction.
//! 2. **Extraction:** Destination and source locations, or a bypass verdict.

/// Operand extraction (destination/source view, bypass rules).
pub mod extract;

/// Instruction descriptors, raw operands and categories.
pub mod instruction;

pub use extract::{OperandView, extract};
pub use instruction::{Category, InstructionDescriptor, MemRef, Operand};
