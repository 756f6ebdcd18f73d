//! Instruction Descriptor Extractor.
//!
//! Turns a raw [`InstructionDescriptor`] into the view the simulator reasons
//! about:
//! 1. **Operand values:** Absent, register, or memory (address surrogate) per operand index.
//! 2. **Destination:** Operand 0 when it names a register or memory location.
//! 3. **Sources:** Every present operand, operand 0 included, since the traced
//!    instruction set uses two-address read-modify-write forms.
//!
//! Instructions with more operands than `max_operands`, or outside the
//! binary/logical categories when categories are restricted, bypass analysis:
//! [`extract`] returns `None` and the simulator admits them as opaque entries.

use crate::common::location::{Location, OperandValue};
use crate::config::Config;
use crate::isa::instruction::{InstructionDescriptor, Operand};

/// Normalized operand view of one instruction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OperandView {
    /// One value per operand index.
    pub operands: Vec<OperandValue>,
    /// Location written by the instruction, if any.
    pub destination: Option<Location>,
    /// Locations read by the instruction, in operand order.
    pub sources: Vec<Location>,
}

/// Resolves a raw operand to its operand value.
#[inline]
pub const fn operand_value(op: &Operand) -> OperandValue {
    match op {
        Operand::Reg(reg) => OperandValue::Register(*reg),
        Operand::Mem(mem) => OperandValue::Memory(mem.surrogate()),
        Operand::Imm => OperandValue::Absent,
    }
}

/// Builds the operand view of `desc`, or `None` if it bypasses analysis.
pub fn extract(desc: &InstructionDescriptor, config: &Config) -> Option<OperandView> {
    if desc.operands.len() > config.window.max_operands {
        return None;
    }
    if config.policy.restrict_categories && !desc.category.is_arithmetic_or_logical() {
        return None;
    }

    let operands: Vec<OperandValue> = desc.operands.iter().map(operand_value).collect();
    let destination = operands.first().and_then(|v| v.location());
    let sources = operands.iter().filter_map(|v| v.location()).collect();

    Some(OperandView {
        operands,
        destination,
        sources,
    })
}
