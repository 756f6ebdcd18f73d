//! Forwarding window container.
//!
//! The window is an ordered, bounded sequence of in-flight entries. Index 0
//! is the oldest entry (next to retire); the tail is the newest. It provides:
//! 1. **Admission:** Appends entries at the tail, evicting the oldest when full.
//! 2. **Lookup:** Finds entries by position or by tag.
//! 3. **Relocation:** Moves a single entry, or a group of entries, to a new position
//!    while keeping every other entry in its relative order.
//! 4. **Bookkeeping:** Records forwards and missed forwards between entries.

use std::collections::VecDeque;

use crate::common::tag::EntryTag;
use crate::window::entry::WindowEntry;

/// Bounded, order-mutable window of in-flight instructions.
#[derive(Clone, Debug)]
pub struct Window {
    /// Entries, oldest first.
    entries: VecDeque<WindowEntry>,
    /// Maximum number of entries.
    capacity: usize,
}

impl Window {
    /// Creates an empty window holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the window capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of occupied entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the window is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the window is full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Removes and returns the oldest entry.
    pub fn evict_oldest(&mut self) -> Option<WindowEntry> {
        self.entries.pop_front()
    }

    /// Appends `entry` at the tail, evicting the oldest entry first if full.
    ///
    /// Returns the evicted entry, if any.
    pub fn push(&mut self, entry: WindowEntry) -> Option<WindowEntry> {
        let evicted = if self.is_full() {
            self.evict_oldest()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    /// Returns the entry at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&WindowEntry> {
        self.entries.get(index)
    }

    /// Returns the position of the entry tagged `tag`.
    pub fn position(&self, tag: EntryTag) -> Option<usize> {
        self.entries.iter().rposition(|e| e.tag == tag)
    }

    /// Returns the entry tagged `tag`.
    pub fn find(&self, tag: EntryTag) -> Option<&WindowEntry> {
        self.entries.iter().rev().find(|e| e.tag == tag)
    }

    /// Returns a mutable reference to the entry tagged `tag`.
    pub fn find_mut(&mut self, tag: EntryTag) -> Option<&mut WindowEntry> {
        self.entries.iter_mut().rev().find(|e| e.tag == tag)
    }

    /// Returns the newest entry.
    #[inline]
    pub fn tail(&self) -> Option<&WindowEntry> {
        self.entries.back()
    }

    /// Iterates entries oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &WindowEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    /// Returns the tags of all entries, oldest first.
    pub fn tags(&self) -> Vec<EntryTag> {
        self.entries.iter().map(|e| e.tag).collect()
    }

    /// Moves the entry at `from` so that it ends up at index `to`.
    ///
    /// Every other entry keeps its relative order. Returns false if either
    /// index is out of range.
    pub fn relocate(&mut self, from: usize, to: usize) -> bool {
        if from >= self.entries.len() || to >= self.entries.len() {
            return false;
        }
        if from == to {
            return true;
        }
        let Some(entry) = self.entries.remove(from) else {
            return false;
        };
        self.entries.insert(to, entry);
        true
    }

    /// Moves the entries tagged `group` to sit directly after `anchor`.
    ///
    /// The group keeps its current relative order. Every group member must be
    /// younger than the anchor; otherwise nothing moves and false is returned.
    pub fn move_group_after(&mut self, anchor: EntryTag, group: &[EntryTag]) -> bool {
        let Some(anchor_pos) = self.position(anchor) else {
            return false;
        };
        let mut positions = Vec::with_capacity(group.len());
        for &tag in group {
            match self.position(tag) {
                Some(pos) if pos > anchor_pos => positions.push(pos),
                _ => return false,
            }
        }
        positions.sort_unstable();
        positions.dedup();

        let mut moved = Vec::with_capacity(positions.len());
        for &pos in positions.iter().rev() {
            if let Some(entry) = self.entries.remove(pos) {
                moved.push(entry);
            }
        }
        for (offset, entry) in moved.into_iter().rev().enumerate() {
            self.entries.insert(anchor_pos + 1 + offset, entry);
        }
        true
    }

    /// Records a forward from `producer` to `consumer` on both entries.
    ///
    /// Returns false (and records nothing) if either entry is gone.
    pub fn link(&mut self, producer: EntryTag, consumer: EntryTag) -> bool {
        if self.find(producer).is_none() || self.find(consumer).is_none() {
            return false;
        }
        if let Some(p) = self.find_mut(producer) {
            p.forwards_to.push(consumer);
        }
        if let Some(c) = self.find_mut(consumer) {
            c.forwards_from.push(producer);
        }
        true
    }

    /// Records a missed forward from `producer` to `consumer`.
    pub fn record_missed(&mut self, producer: EntryTag, consumer: EntryTag) {
        if let Some(p) = self.find_mut(producer) {
            p.missed_forwards_to.push(consumer);
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
