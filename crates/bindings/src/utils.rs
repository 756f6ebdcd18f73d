//! Utility functions exposed to Python.

use pyo3::prelude::*;
use tracing_subscriber::EnvFilter;

/// Returns the package version string.
#[pyfunction]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Installs a stderr log subscriber.
///
/// `filter` uses `RUST_LOG` syntax (e.g. `"robscan_core=debug"`); without it
/// `RUST_LOG` is read, falling back to `warn`. Calling this twice is a no-op.
#[pyfunction]
#[pyo3(signature = (filter=None))]
pub fn enable_logging(filter: Option<&str>) -> bool {
    let filter = filter.map_or_else(
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        EnvFilter::new,
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
