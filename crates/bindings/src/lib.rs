//! Python bindings for the forwarding window simulator.
//!
//! This crate exposes the simulator to Python via PyO3 so a live tracer can
//! feed instructions directly. It provides:
//! 1. **Simulator:** `Simulator` for admitting instruction records and writing the report.
//! 2. **Statistics:** `Stats` for the run counters and the forwarding potential.
//! 3. **Utilities:** Version string, log setup and conversion helpers for Python↔Rust types.

use pyo3::prelude::*;

/// Python dict ↔ Rust conversions (config, records, admissions).
pub mod conversion;
/// Simulator binding (`Simulator`).
pub mod simulator;
/// Statistics binding (`Stats`).
pub mod stats;
/// Utility functions (version, logging).
pub mod utils;

/// Registers all simulator classes and functions onto the given Python module.
///
/// # Errors
///
/// Returns a `PyErr` if registration fails.
pub fn register_robscan_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<simulator::PySimulator>()?;
    m.add_class::<stats::PyStats>()?;

    m.add_function(wrap_pyfunction!(utils::version, m)?)?;
    m.add_function(wrap_pyfunction!(utils::enable_logging, m)?)?;

    Ok(())
}

#[pymodule]
fn robscan(m: &Bound<'_, PyModule>) -> PyResult<()> {
    register_robscan_module(m)?;
    Ok(())
}
