//! Statistics Python binding.
//!
//! Exposes the run counters to Python: getters for every counter, the
//! forwarding potential, `print` for the human-readable block and `to_dict`
//! for JSON-serializable export.

use pyo3::prelude::*;
use pyo3::types::PyDict;
use robscan_core::stats::RunCounters;

/// Python-exposed statistics: a snapshot of the run counters.
#[pyclass(name = "Stats")]
#[derive(Clone, Debug)]
pub struct PyStats {
    /// Counters at the time the snapshot was taken.
    pub inner: RunCounters,
}

#[pymethods]
impl PyStats {
    #[getter]
    fn instructions(&self) -> u64 {
        self.inner.instructions
    }
    #[getter]
    fn forwards(&self) -> u64 {
        self.inner.forwards
    }
    #[getter]
    fn relocations(&self) -> u64 {
        self.inner.relocations
    }
    #[getter]
    fn missed_forwards(&self) -> u64 {
        self.inner.missed_forwards
    }
    #[getter]
    fn bypassed(&self) -> u64 {
        self.inner.bypassed
    }
    #[getter]
    fn evictions(&self) -> u64 {
        self.inner.evictions
    }
    #[getter]
    fn backfills(&self) -> u64 {
        self.inner.backfills
    }

    /// Forwards per instruction, or `None` before the first instruction.
    #[getter]
    fn potential(&self) -> Option<f64> {
        self.inner.forwarding_potential()
    }

    /// Print the statistics block.
    fn print(&self) {
        self.inner.print();
    }

    /// Export all counters as a Python dict.
    fn to_dict(&self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let d = PyDict::new(py);
        let s = &self.inner;
        d.set_item("instructions", s.instructions)?;
        d.set_item("forwards", s.forwards)?;
        d.set_item("potential", s.forwarding_potential())?;
        d.set_item("relocations", s.relocations)?;
        d.set_item("missed_forwards", s.missed_forwards)?;
        d.set_item("bypassed", s.bypassed)?;
        d.set_item("evictions", s.evictions)?;
        d.set_item("backfills", s.backfills)?;
        Ok(d.unbind())
    }

    fn __repr__(&self) -> String {
        format!(
            "Stats(instructions={}, forwards={})",
            self.inner.instructions, self.inner.forwards
        )
    }
}
