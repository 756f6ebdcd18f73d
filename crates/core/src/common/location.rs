//! Operand identities.
//!
//! An operand names either a register or a memory location. Memory locations
//! are identified by an address surrogate computed by the extractor, so two
//! memory operands match exactly when their surrogates are equal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Architectural register identifier as reported by the trace host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegId(pub u32);

impl fmt::Display for RegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A location an instruction reads or writes.
///
/// Two locations match iff they have the same kind and the same identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    /// A named register.
    Register(RegId),
    /// A memory location identified by its address surrogate.
    Memory(u64),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register(reg) => write!(f, "{reg}"),
            Self::Memory(addr) => write!(f, "[{addr:#x}]"),
        }
    }
}

/// One operand of an instruction at the time it entered the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum OperandValue {
    /// No register or memory identity (immediates, unsupported operand kinds).
    #[default]
    Absent,
    /// A register operand.
    Register(RegId),
    /// A memory operand with its resolved address surrogate.
    Memory(u64),
}

impl OperandValue {
    /// Returns the location this operand names, or `None` when absent.
    #[inline]
    pub const fn location(self) -> Option<Location> {
        match self {
            Self::Absent => None,
            Self::Register(reg) => Some(Location::Register(reg)),
            Self::Memory(addr) => Some(Location::Memory(addr)),
        }
    }

    /// Returns true if the operand carries no identity.
    #[inline]
    pub const fn is_absent(self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl From<Location> for OperandValue {
    fn from(loc: Location) -> Self {
        match loc {
            Location::Register(reg) => Self::Register(reg),
            Location::Memory(addr) => Self::Memory(addr),
        }
    }
}
