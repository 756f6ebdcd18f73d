//! Run statistics collection and reporting.
//!
//! This module tracks the counters of a forwarding run. It provides:
//! 1. **Headline counters:** Instructions observed and forwarding bindings established.
//! 2. **Forwarding potential:** The guarded ratio of the two.
//! 3. **Diagnostics:** Relocations, missed forwards, bypassed instructions, evictions and backfills.
//! 4. **Output:** The end-of-run report file format and a human-readable stats block.

use std::io::{self, Write};
use std::time::Instant;

/// Counters of one simulated run.
///
/// All counters start at zero and only ever increase.
#[derive(Clone, Debug)]
pub struct RunCounters {
    start_time: Instant,
    /// Total instructions observed.
    pub instructions: u64,
    /// Total producer→consumer bindings established.
    pub forwards: u64,

    /// Entries moved to a new window position.
    pub relocations: u64,
    /// Forwarding opportunities that were legal but not realized.
    pub missed_forwards: u64,
    /// Instructions admitted without dependency analysis.
    pub bypassed: u64,
    /// Entries retired by capacity eviction.
    pub evictions: u64,
    /// Bindings established by the backfill pass.
    pub backfills: u64,
}

impl Default for RunCounters {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            instructions: 0,
            forwards: 0,
            relocations: 0,
            missed_forwards: 0,
            bypassed: 0,
            evictions: 0,
            backfills: 0,
        }
    }
}

impl PartialEq for RunCounters {
    fn eq(&self, other: &Self) -> bool {
        self.instructions == other.instructions
            && self.forwards == other.forwards
            && self.relocations == other.relocations
            && self.missed_forwards == other.missed_forwards
            && self.bypassed == other.bypassed
            && self.evictions == other.evictions
            && self.backfills == other.backfills
    }
}

impl RunCounters {
    /// Returns `forwards / instructions`, or `None` when no instruction was observed.
    ///
    /// # Examples
    ///
    /// ```
    /// use robscan_core::stats::RunCounters;
    ///
    /// let mut counters = RunCounters::default();
    /// assert_eq!(counters.forwarding_potential(), None);
    /// counters.instructions = 4;
    /// counters.forwards = 1;
    /// assert_eq!(counters.forwarding_potential(), Some(0.25));
    /// ```
    pub fn forwarding_potential(&self) -> Option<f64> {
        if self.instructions == 0 {
            None
        } else {
            Some(self.forwards as f64 / self.instructions as f64)
        }
    }

    /// Writes the end-of-run report.
    ///
    /// The format is two `name value` lines, plus the forwarding potential when
    /// `include_potential` is set. An empty run reports the potential as `undefined`.
    ///
    /// # Errors
    ///
    /// Propagates any error from `out`.
    pub fn write_report<W: Write>(&self, mut out: W, include_potential: bool) -> io::Result<()> {
        writeln!(out, "Forwarding count {}", self.forwards)?;
        writeln!(out, "Total inst count {}", self.instructions)?;
        if include_potential {
            match self.forwarding_potential() {
                Some(ratio) => writeln!(out, "Forwarding Potential {ratio}")?,
                None => writeln!(out, "Forwarding Potential undefined")?,
            }
        }
        out.flush()
    }

    /// Prints the statistics block to stdout.
    ///
    /// # Panics
    ///
    /// This function will not panic. Percentages are computed against
    /// `max(instructions, 1)`.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let instr = self.instructions.max(1) as f64;
        let pct = |n: u64| (n as f64 / instr) * 100.0;
        let kips = if seconds > 0.0 {
            (self.instructions as f64 / seconds) / 1000.0
        } else {
            0.0
        };

        println!("\n==========================================================");
        println!("FORWARDING WINDOW STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("sim_insts                {}", self.instructions);
        println!("sim_kips                 {kips:.2}");
        println!("----------------------------------------------------------");
        println!("FORWARDING");
        println!("  fwd.bindings           {}", self.forwards);
        match self.forwarding_potential() {
            Some(ratio) => println!("  fwd.potential          {ratio:.4}"),
            None => println!("  fwd.potential          undefined"),
        }
        println!(
            "  fwd.missed             {} ({:.2}%)",
            self.missed_forwards,
            pct(self.missed_forwards)
        );
        println!(
            "  fwd.backfills          {} ({:.2}%)",
            self.backfills,
            pct(self.backfills)
        );
        println!("----------------------------------------------------------");
        println!("WINDOW");
        println!(
            "  win.relocations        {} ({:.2}%)",
            self.relocations,
            pct(self.relocations)
        );
        println!(
            "  win.bypassed           {} ({:.2}%)",
            self.bypassed,
            pct(self.bypassed)
        );
        println!("  win.evictions          {}", self.evictions);
        println!("==========================================================");
    }
}
