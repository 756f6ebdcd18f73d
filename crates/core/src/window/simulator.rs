//! Forwarding window simulator.
//!
//! Owns the window and the run counters and admits one instruction at a time.
//! Every admission runs the same sequence:
//! 1. **Evict:** Retire the oldest entry if the window is full.
//! 2. **Match:** Find the newest (and second newest) writer of every source.
//! 3. **Filter:** Drop candidates that would skip past a more recent write.
//! 4. **Insert:** Append the consumer at the tail.
//! 5. **Bind:** Serve ranked producers newest first, relocating the consumer
//!    (and, for later ranks, its already bound producers) next to each producer.
//! 6. **Backfill:** Pull idle producers next to a consumer that got nothing.
//!
//! Nothing here fails: an opportunity that cannot be realized is recorded as a
//! missed forward and the window is always left within capacity.

use tracing::{debug, trace};

use crate::common::error::ConfigError;
use crate::common::tag::EntryTag;
use crate::config::Config;
use crate::isa::extract::extract;
use crate::isa::instruction::InstructionDescriptor;
use crate::stats::RunCounters;
use crate::window::buffer::Window;
use crate::window::entry::WindowEntry;
use crate::window::matcher::{barrier, filter_hazards, match_sources, rank};

/// Outcome of admitting one instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Admission {
    /// Tag assigned to the instruction.
    pub tag: EntryTag,
    /// The instruction skipped dependency analysis.
    pub bypassed: bool,
    /// Forwarding bindings established for it.
    pub bindings: usize,
    /// Some entry was moved while admitting it.
    pub relocated: bool,
    /// Forwarding opportunities recorded as missed.
    pub missed: usize,
}

/// Read-only view of a run at some point in time.
#[derive(Clone, Debug, PartialEq)]
pub struct SimSnapshot {
    /// Counters so far.
    pub counters: RunCounters,
    /// Entries currently in the window.
    pub occupancy: usize,
    /// Window capacity.
    pub capacity: usize,
}

/// Per-admission working state.
struct Pass {
    consumer: EntryTag,
    /// Newest matched producer, filtered or not.
    barrier: Option<EntryTag>,
    /// Every matched producer, filtered or not.
    dependencies: Vec<EntryTag>,
    /// Producers bound so far, in rank order.
    bound: Vec<EntryTag>,
    chain_closed: bool,
    admission: Admission,
}

/// Windowed dependency tracker and relocation scheduler.
///
/// # Examples
///
/// ```
/// use robscan_core::common::{InstId, RegId};
/// use robscan_core::config::Config;
/// use robscan_core::isa::{Category, InstructionDescriptor, Operand};
/// use robscan_core::window::ForwardingSimulator;
///
/// let mut sim = ForwardingSimulator::new(Config::default()).unwrap();
/// let write_r1 = InstructionDescriptor::new(InstId(1), Category::Binary, vec![Operand::Reg(RegId(1))]);
/// let read_r1 = InstructionDescriptor::new(
///     InstId(2),
///     Category::Binary,
///     vec![Operand::Reg(RegId(2)), Operand::Reg(RegId(1))],
/// );
/// let _ = sim.admit(&write_r1);
/// let admission = sim.admit(&read_r1);
/// assert_eq!(admission.bindings, 1);
/// assert_eq!(sim.counters().forwards, 1);
/// ```
#[derive(Debug)]
pub struct ForwardingSimulator {
    config: Config,
    window: Window,
    counters: RunCounters,
    next_tag: u64,
}

impl ForwardingSimulator {
    /// Creates a simulator for one run.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`Config::validate`].
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            window: Window::new(config.window.capacity),
            config,
            counters: RunCounters::default(),
            next_tag: 0,
        })
    }

    /// Returns the configuration of this run.
    #[inline]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the window.
    #[inline]
    pub const fn window(&self) -> &Window {
        &self.window
    }

    /// Returns the counters so far.
    #[inline]
    pub const fn counters(&self) -> &RunCounters {
        &self.counters
    }

    /// Returns a copy of the counters and the window occupancy.
    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            counters: self.counters.clone(),
            occupancy: self.window.len(),
            capacity: self.window.capacity(),
        }
    }

    /// Empties the window and zeroes the counters.
    pub fn reset(&mut self) {
        self.window.clear();
        self.counters = RunCounters::default();
        self.next_tag = 0;
    }

    /// Admits one dynamic instruction.
    pub fn admit(&mut self, desc: &InstructionDescriptor) -> Admission {
        self.counters.instructions += 1;
        if self.window.is_full() && self.window.evict_oldest().is_some() {
            self.counters.evictions += 1;
        }

        let tag = EntryTag(self.next_tag);
        self.next_tag += 1;

        let Some(view) = extract(desc, &self.config) else {
            let _ = self
                .window
                .push(WindowEntry::opaque(tag, desc.id, desc.category));
            self.counters.bypassed += 1;
            trace!(%tag, inst = %desc.id, "admitted without analysis");
            return Admission {
                tag,
                bypassed: true,
                ..Admission::default()
            };
        };

        let mut matches = match_sources(&self.window, &view.sources);
        let tag_at = |i: usize| self.window.get(i).map(|e| e.tag);
        let barrier = barrier(&matches).and_then(tag_at);
        let dependencies: Vec<EntryTag> = matches
            .iter()
            .filter_map(|m| m.best)
            .filter_map(tag_at)
            .collect();
        let discarded = filter_hazards(&mut matches);
        let candidates: Vec<EntryTag> = rank(&matches, self.config.window.max_operands)
            .into_iter()
            .filter_map(tag_at)
            .collect();
        if !discarded.is_empty() {
            trace!(%tag, ?discarded, "hazard filter dropped candidates");
        }

        let _ = self.window.push(
            WindowEntry::new(tag, desc.id, desc.category, view.destination)
                .with_sources(view.sources),
        );

        let mut pass = Pass {
            consumer: tag,
            barrier,
            dependencies,
            bound: Vec::with_capacity(candidates.len()),
            chain_closed: false,
            admission: Admission {
                tag,
                ..Admission::default()
            },
        };

        if let Some((&primary, rest)) = candidates.split_first() {
            if self.bind_primary(&mut pass, primary) {
                for &producer in rest {
                    self.bind_ranked(&mut pass, producer);
                }
            }
        }

        if pass.admission.bindings == 0 && !self.config.policy.baseline && self.config.policy.backfill
        {
            self.backfill(&mut pass, &candidates);
        }

        trace!(
            %tag,
            inst = %desc.id,
            candidates = candidates.len(),
            bindings = pass.admission.bindings,
            relocated = pass.admission.relocated,
            "admitted"
        );
        pass.admission
    }

    /// Rank 1: bind the newest producer, relocating the consumer next to it if needed.
    fn bind_primary(&mut self, pass: &mut Pass, producer: EntryTag) -> bool {
        let (Some(p), Some(c)) = (
            self.window.position(producer),
            self.window.position(pass.consumer),
        ) else {
            return false;
        };
        if !self.has_degree(producer) {
            self.miss(pass, producer);
            return false;
        }
        if c - p <= self.config.window.imminent_distance {
            return self.bind(pass, producer);
        }
        if self.config.policy.baseline {
            self.miss(pass, producer);
            return false;
        }

        let floor = pass
            .barrier
            .and_then(|b| self.window.position(b))
            .unwrap_or(p);
        match self.find_slot(producer, p, c, floor) {
            Some(slot) => {
                if slot != c {
                    self.relocate(pass, c, slot);
                }
                self.bind(pass, producer)
            }
            None => {
                self.miss(pass, producer);
                false
            }
        }
    }

    /// Finds where the consumer at `c` can sit after the producer at `p`.
    ///
    /// A slot is free when the entry it displaces has no inbound forward. The
    /// nearest free slot wins. When the entry right after the producer already
    /// depends solely on it, the slot after that one is accepted too, so the
    /// producer's chain stays together. Returns `c` if the consumer can stay put.
    fn find_slot(&self, producer: EntryTag, p: usize, c: usize, floor: usize) -> Option<usize> {
        let w = &self.config.window;
        let last = if w.extend_to_tail {
            c - 1
        } else {
            (p + w.lookahead).min(c - 1)
        };
        let first = p.max(floor) + 1;

        let next = self.window.get(p + 1);
        let chained = next.is_some_and(|e| e.depends_solely_on(producer));
        let chain_tail = next.map(|e| e.tag);

        for slot in first..=last {
            let resident = self.window.get(slot)?;
            if !resident.has_inbound() {
                return Some(slot);
            }
            if chained && slot == p + 2 && !chain_tail.is_some_and(|t| resident.depends_on(t)) {
                return Some(slot);
            }
        }
        if chained && p + 2 == c && first <= c && w.lookahead >= 2 {
            return Some(c);
        }
        None
    }

    /// Ranks 2 and up: bind an older producer, moving the bound chain next to it.
    fn bind_ranked(&mut self, pass: &mut Pass, producer: EntryTag) {
        let (Some(pk), Some(c)) = (
            self.window.position(producer),
            self.window.position(pass.consumer),
        ) else {
            return;
        };
        if !self.has_degree(producer) {
            self.miss(pass, producer);
            pass.chain_closed = true;
            return;
        }
        if c > pk && c - pk <= self.config.window.lookahead {
            let _ = self.bind(pass, producer);
            return;
        }
        if pass.chain_closed {
            return;
        }
        if self.config.policy.baseline || !self.chain_open(pass) {
            self.miss(pass, producer);
            pass.chain_closed = true;
            return;
        }

        let mut group = pass.bound.clone();
        group.push(pass.consumer);
        if !self.group_fits(pass, producer, pk, &group)
            || !self.window.move_group_after(producer, &group)
        {
            self.miss(pass, producer);
            pass.chain_closed = true;
            return;
        }
        self.counters.relocations += group.len() as u64;
        pass.admission.relocated = true;
        debug!(
            producer = %producer,
            consumer = %pass.consumer,
            group = group.len(),
            "moved bound chain after older producer"
        );
        let _ = self.bind(pass, producer);
    }

    /// True if every bound producer is free of inbound forwards and the last one has spare degree.
    fn chain_open(&self, pass: &Pass) -> bool {
        let Some(&prev) = pass.bound.last() else {
            return false;
        };
        let max = self.config.window.max_forwards;
        pass.bound
            .iter()
            .all(|&t| self.window.find(t).is_some_and(|e| !e.has_inbound()))
            && self
                .window
                .find(prev)
                .is_some_and(|e| e.forwards_to.len() < max)
    }

    /// Checks that `group` can move to sit right after the producer at `pk`.
    fn group_fits(&self, pass: &Pass, producer: EntryTag, pk: usize, group: &[EntryTag]) -> bool {
        let all_younger = group
            .iter()
            .all(|&t| self.window.position(t).is_some_and(|pos| pos > pk));
        if !all_younger {
            return false;
        }

        let lookahead_clear = self
            .window
            .iter()
            .skip(pk + 1)
            .filter(|e| !group.contains(&e.tag))
            .take(self.config.window.lookahead)
            .all(|e| !e.has_inbound());
        if !lookahead_clear {
            return false;
        }

        // The consumer must stay behind every producer it matched.
        let consumer_clear = pass
            .dependencies
            .iter()
            .filter(|&&d| d != producer && !group.contains(&d))
            .all(|&d| self.window.position(d).is_none_or(|pos| pos < pk));
        if !consumer_clear {
            return false;
        }

        // No member may overtake a writer of something it reads, bound or not.
        group.iter().all(|&t| {
            let (Some(pos), Some(member)) = (self.window.position(t), self.window.find(t)) else {
                return false;
            };
            self.window
                .iter()
                .take(pos)
                .skip(pk + 1)
                .filter(|e| !group.contains(&e.tag))
                .all(|e| !member.reads_result_of(e))
        })
    }

    /// Pulls idle candidate producers directly in front of an unforwarded tail consumer.
    fn backfill(&mut self, pass: &mut Pass, candidates: &[EntryTag]) {
        for &producer in candidates {
            if !self.window.tail().is_some_and(|e| e.tag == pass.consumer) {
                return;
            }
            let Some(c) = self.window.position(pass.consumer) else {
                return;
            };
            let (Some(p), Some(entry)) = (self.window.position(producer), self.window.find(producer))
            else {
                continue;
            };
            if !entry.is_idle() || !self.has_degree(producer) {
                continue;
            }
            // Moving later must not leave a reader of its result ahead of it.
            let overtakes_reader = self
                .window
                .iter()
                .take(c)
                .skip(p + 1)
                .any(|e| e.reads_result_of(entry));
            if overtakes_reader {
                trace!(%producer, consumer = %pass.consumer, "backfill would pass a reader");
                continue;
            }
            if p + 1 != c {
                self.relocate(pass, p, c - 1);
            }
            if self.bind(pass, producer) {
                self.counters.backfills += 1;
            }
        }
    }

    fn has_degree(&self, producer: EntryTag) -> bool {
        self.window
            .find(producer)
            .is_some_and(|e| e.forwards_to.len() < self.config.window.max_forwards)
    }

    fn bind(&mut self, pass: &mut Pass, producer: EntryTag) -> bool {
        if !self.window.link(producer, pass.consumer) {
            return false;
        }
        self.counters.forwards += 1;
        pass.bound.push(producer);
        pass.admission.bindings += 1;
        debug!(producer = %producer, consumer = %pass.consumer, "forward bound");
        true
    }

    fn relocate(&mut self, pass: &mut Pass, from: usize, to: usize) {
        if self.window.relocate(from, to) {
            self.counters.relocations += 1;
            pass.admission.relocated = true;
            debug!(from, to, consumer = %pass.consumer, "relocated entry");
        }
    }

    fn miss(&mut self, pass: &mut Pass, producer: EntryTag) {
        self.counters.missed_forwards += 1;
        pass.admission.missed += 1;
        if self.config.policy.track_missed {
            self.window.record_missed(producer, pass.consumer);
        }
        debug!(producer = %producer, consumer = %pass.consumer, "forward missed");
    }
}
