//! Producer matching and hazard filtering.
//!
//! For each source operand of an incoming instruction, the matcher finds the
//! newest window entry that writes the same location (the forwarding
//! candidate) and the matching entry before it. It provides:
//! 1. **Matching:** One oldest-to-newest scan over the window.
//! 2. **Hazard filtering:** Drops a candidate that is older than an earlier
//!    write seen for a different operand, so forwarding never skips past a
//!    more recent producer.
//! 3. **Ranking:** Surviving producers, de-duplicated, newest first.

use crate::common::location::Location;
use crate::window::buffer::Window;

/// Producers found for one source operand, as window positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourceMatch {
    /// Newest entry writing the operand's location.
    pub best: Option<usize>,
    /// The matching entry immediately before `best` in window order.
    pub second: Option<usize>,
}

/// Scans `window` oldest to newest and records the last two writers of every source.
///
/// # Examples
///
/// ```
/// use robscan_core::common::{EntryTag, InstId, Location, RegId};
/// use robscan_core::isa::Category;
/// use robscan_core::window::{Window, WindowEntry, match_sources};
///
/// let r1 = Location::Register(RegId(1));
/// let mut window = Window::new(8);
/// for n in 0..3 {
///     let dest = if n == 1 { None } else { Some(r1) };
///     let _ = window.push(WindowEntry::new(EntryTag(n), InstId(n), Category::Binary, dest));
/// }
/// let matches = match_sources(&window, &[r1]);
/// assert_eq!(matches[0].best, Some(2));
/// assert_eq!(matches[0].second, Some(0));
/// ```
pub fn match_sources(window: &Window, sources: &[Location]) -> Vec<SourceMatch> {
    let mut matches = vec![SourceMatch::default(); sources.len()];
    for (idx, entry) in window.iter().enumerate() {
        let Some(dest) = entry.destination else {
            continue;
        };
        for (m, src) in matches.iter_mut().zip(sources) {
            if dest == *src {
                m.second = m.best;
                m.best = Some(idx);
            }
        }
    }
    matches
}

/// Discards every candidate that is strictly older than another operand's `second` writer.
///
/// Returns the positions of the discarded candidates. The check uses the
/// unfiltered `second` values, so the outcome does not depend on operand order.
pub fn filter_hazards(matches: &mut [SourceMatch]) -> Vec<usize> {
    let seconds: Vec<Option<usize>> = matches.iter().map(|m| m.second).collect();
    let mut discarded = Vec::new();
    for (i, m) in matches.iter_mut().enumerate() {
        let Some(best) = m.best else {
            continue;
        };
        let hazard = seconds
            .iter()
            .enumerate()
            .any(|(j, second)| j != i && second.is_some_and(|s| best < s));
        if hazard {
            m.best = None;
            discarded.push(best);
        }
    }
    discarded
}

/// Returns the surviving candidate positions, newest first, without duplicates.
///
/// At most `limit` positions are returned.
pub fn rank(matches: &[SourceMatch], limit: usize) -> Vec<usize> {
    let mut ranked: Vec<usize> = matches.iter().filter_map(|m| m.best).collect();
    ranked.sort_unstable_by(|a, b| b.cmp(a));
    ranked.dedup();
    ranked.truncate(limit);
    ranked
}

/// Returns the newest matched position before filtering: the consumer may never move ahead of it.
pub fn barrier(matches: &[SourceMatch]) -> Option<usize> {
    matches.iter().filter_map(|m| m.best).max()
}
