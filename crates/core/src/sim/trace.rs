//! JSON Lines trace reader.
//!
//! A trace is one [`InstructionDescriptor`] per line in execution order:
//!
//! ```text
//! # comment lines and blank lines are skipped
//! {"id": 4198400, "category": "binary", "operands": [{"reg": 0}, {"reg": 3}]}
//! {"id": 4198403, "category": "data_transfer", "operands": [{"reg": 1}, {"mem": {"base": 4096, "displacement": 8}}]}
//! ```

use std::io::BufRead;

use tracing::debug;

use crate::common::error::TraceError;
use crate::isa::instruction::InstructionDescriptor;
use crate::window::simulator::ForwardingSimulator;

/// Iterator over the records of a JSON Lines trace.
#[derive(Debug)]
pub struct TraceReader<R> {
    inner: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps `inner`.
    pub const fn new(inner: R) -> Self {
        Self {
            inner,
            line: 0,
            buf: String::new(),
        }
    }

    /// Returns the number of lines consumed so far.
    #[inline]
    pub const fn line(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<InstructionDescriptor, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.inner.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line += 1,
                Err(e) => return Some(Err(TraceError::Io(e))),
            }
            let record = self.buf.trim();
            if record.is_empty() || record.starts_with('#') {
                continue;
            }
            return Some(
                serde_json::from_str(record).map_err(|source| TraceError::Parse {
                    line: self.line,
                    source,
                }),
            );
        }
    }
}

/// Admits every record of `reader` into `sim`, stopping at the first bad record.
///
/// Returns the number of instructions admitted.
///
/// # Errors
///
/// Returns the first [`TraceError`]. Records before it stay admitted.
///
/// # Examples
///
/// ```
/// use robscan_core::config::Config;
/// use robscan_core::sim::{TraceReader, replay};
/// use robscan_core::window::ForwardingSimulator;
///
/// let trace = "\
/// {\"id\": 1, \"category\": \"binary\", \"operands\": [{\"reg\": 1}]}
/// {\"id\": 2, \"category\": \"binary\", \"operands\": [{\"reg\": 2}, {\"reg\": 1}]}
/// ";
/// let mut sim = ForwardingSimulator::new(Config::default()).unwrap();
/// let admitted = replay(&mut sim, TraceReader::new(trace.as_bytes())).unwrap();
/// assert_eq!(admitted, 2);
/// assert_eq!(sim.counters().forwards, 1);
/// ```
pub fn replay<R: BufRead>(
    sim: &mut ForwardingSimulator,
    mut reader: TraceReader<R>,
) -> Result<u64, TraceError> {
    let mut admitted = 0;
    for record in reader.by_ref() {
        let _ = sim.admit(&record?);
        admitted += 1;
    }
    debug!(admitted, lines = reader.line(), "trace replay finished");
    Ok(admitted)
}
