//! Instruction identities.
//!
//! The trace host hands out an opaque [`InstId`] per instruction. The same
//! static instruction shows up many times in a dynamic stream, so the window
//! keys its bookkeeping on an [`EntryTag`] assigned at admission instead.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque instruction handle supplied by the trace host.
///
/// Compared by identity only; the simulator never interprets it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstId(pub u64);

impl fmt::Display for InstId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Unique tag identifying one admitted (dynamic) instruction.
///
/// Tags increase monotonically in admission order, so a smaller tag always
/// belongs to an instruction that arrived earlier in program order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EntryTag(pub u64);

impl fmt::Display for EntryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
