//! Window entries.

use crate::common::location::Location;
use crate::common::tag::{EntryTag, InstId};
use crate::isa::instruction::Category;

/// One in-flight instruction in the forwarding window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowEntry {
    /// Unique tag assigned at admission.
    pub tag: EntryTag,
    /// Opaque handle of the originating instruction.
    pub inst: InstId,
    /// Decoder category.
    pub category: Category,
    /// Location written by this instruction, if any.
    pub destination: Option<Location>,
    /// Locations read by this instruction.
    pub sources: Vec<Location>,
    /// Consumers this entry forwards its result to.
    pub forwards_to: Vec<EntryTag>,
    /// Producers this entry receives forwarded operands from.
    pub forwards_from: Vec<EntryTag>,
    /// Consumers that could legally have been forwarded to but were not.
    pub missed_forwards_to: Vec<EntryTag>,
    /// False for entries admitted without dependency analysis.
    pub analyzed: bool,
}

impl WindowEntry {
    /// Creates an analyzed entry with empty bookkeeping.
    pub const fn new(
        tag: EntryTag,
        inst: InstId,
        category: Category,
        destination: Option<Location>,
    ) -> Self {
        Self {
            tag,
            inst,
            category,
            destination,
            sources: Vec::new(),
            forwards_to: Vec::new(),
            forwards_from: Vec::new(),
            missed_forwards_to: Vec::new(),
            analyzed: true,
        }
    }

    /// Sets the locations this entry reads.
    #[must_use]
    pub fn with_sources(mut self, sources: Vec<Location>) -> Self {
        self.sources = sources;
        self
    }

    /// Creates an entry that only occupies capacity; it never matches a source.
    pub fn opaque(tag: EntryTag, inst: InstId, category: Category) -> Self {
        Self {
            analyzed: false,
            ..Self::new(tag, inst, category, None)
        }
    }

    /// Returns true if some producer forwards into this entry.
    #[inline]
    pub fn has_inbound(&self) -> bool {
        !self.forwards_from.is_empty()
    }

    /// Returns true if the only inbound forward comes from `producer`.
    #[inline]
    pub fn depends_solely_on(&self, producer: EntryTag) -> bool {
        self.forwards_from.as_slice() == [producer]
    }

    /// Returns true if this entry receives a forward from `producer`.
    #[inline]
    pub fn depends_on(&self, producer: EntryTag) -> bool {
        self.forwards_from.contains(&producer)
    }

    /// Returns true if no forward, inbound, outbound or missed, touches this entry.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.forwards_to.is_empty()
            && self.forwards_from.is_empty()
            && self.missed_forwards_to.is_empty()
    }

    /// Returns true if this entry reads a location `writer` writes.
    #[inline]
    pub fn reads_result_of(&self, writer: &Self) -> bool {
        self.sources.iter().any(|&loc| writer.writes(loc))
    }

    /// Returns true if this entry writes `loc`.
    #[inline]
    pub fn writes(&self, loc: Location) -> bool {
        self.destination == Some(loc)
    }
}
