//! Error definitions.
//!
//! The admission algorithm itself cannot fail: unmet forwarding opportunities
//! are recorded as data. Errors only arise at the edges:
//! 1. **Configuration:** Rejected before the first instruction is admitted.
//! 2. **Trace input:** I/O failures and malformed records while replaying a trace.

use thiserror::Error;

/// Invalid simulator configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The window must hold at least one entry.
    #[error("window capacity must be positive")]
    ZeroCapacity,

    /// At least one operand has to be tracked.
    #[error("max_operands must be positive")]
    ZeroOperands,

    /// Producers must be allowed at least one forward.
    #[error("max_forwards must be positive")]
    ZeroForwards,

    /// The slot search needs at least one position.
    #[error("lookahead must be positive")]
    ZeroLookahead,

    /// The imminent-forward distance has to fit inside the window.
    #[error("imminent_distance ({distance}) must be smaller than the window capacity ({capacity})")]
    ImminentDistanceTooLarge {
        /// Configured imminent distance.
        distance: usize,
        /// Configured window capacity.
        capacity: usize,
    },

    /// The configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(String),
}

/// Failure while reading a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Underlying reader failed.
    #[error("trace I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line is not a valid trace record.
    #[error("malformed trace record on line {line}: {source}")]
    Parse {
        /// 1-based line number of the offending record.
        line: usize,
        /// JSON decoding error.
        #[source]
        source: serde_json::Error,
    },
}
