//! Instruction descriptors.
//!
//! A descriptor is what the trace host knows about one dynamically executed
//! instruction: an opaque handle, a category and its operands in encoding
//! order. Descriptors deserialize directly from trace records:
//!
//! ```
//! use robscan_core::isa::{Category, InstructionDescriptor, Operand};
//!
//! let line = r#"{"id": 16, "category": "logical", "operands": [{"reg": 0}, "imm"]}"#;
//! let desc: InstructionDescriptor = serde_json::from_str(line).unwrap();
//! assert_eq!(desc.category, Category::Logical);
//! assert_eq!(desc.operands[1], Operand::Imm);
//! ```

use serde::{Deserialize, Serialize};

use crate::common::location::RegId;
use crate::common::tag::InstId;

/// Coarse instruction category reported by the host decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Integer add/sub/mul/div/compare.
    Binary,
    /// and/or/xor/not/test.
    Logical,
    /// Moves, loads and stores.
    DataTransfer,
    /// Shifts and rotates.
    Shift,
    /// Conditional and unconditional branches.
    Branch,
    /// Calls.
    Call,
    /// Returns.
    Return,
    /// Push/pop and other stack manipulation.
    Stack,
    /// String operations.
    String,
    /// Anything else.
    #[default]
    Other,
}

impl Category {
    /// Returns true for the categories analyzed when categories are restricted.
    #[inline]
    pub const fn is_arithmetic_or_logical(self) -> bool {
        matches!(self, Self::Binary | Self::Logical)
    }
}

/// Memory operand as reported by the host: `displacement + base + index * scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemRef {
    /// Base component
    #[serde(default)]
    pub base: u64,
    /// Index component
    #[serde(default)]
    pub index: u64,
    /// Index scale
    #[serde(default = "MemRef::default_scale")]
    pub scale: u64,
    /// Signed displacement
    #[serde(default)]
    pub displacement: i64,
}

impl MemRef {
    /// Unscaled index by default.
    const fn default_scale() -> u64 {
        1
    }

    /// Returns the address surrogate `displacement + base + index * scale`.
    ///
    /// Components are summed as plain wrapping integers; distinct effective
    /// addresses can alias.
    #[inline]
    pub const fn surrogate(&self) -> u64 {
        self.base
            .wrapping_add(self.index.wrapping_mul(self.scale))
            .wrapping_add_signed(self.displacement)
    }
}

impl Default for MemRef {
    fn default() -> Self {
        Self {
            base: 0,
            index: 0,
            scale: 1,
            displacement: 0,
        }
    }
}

/// One raw operand in encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    /// Register operand.
    Reg(RegId),
    /// Memory operand.
    Mem(MemRef),
    /// Immediate or any operand without a register/memory identity.
    Imm,
}

/// One dynamically executed instruction as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstructionDescriptor {
    /// Opaque handle of the static instruction
    pub id: InstId,
    /// Decoder category
    #[serde(default)]
    pub category: Category,
    /// Operands in encoding order; operand 0 is the destination when it names a location
    #[serde(default)]
    pub operands: Vec<Operand>,
}

impl InstructionDescriptor {
    /// Creates a descriptor.
    pub const fn new(id: InstId, category: Category, operands: Vec<Operand>) -> Self {
        Self {
            id,
            category,
            operands,
        }
    }
}
