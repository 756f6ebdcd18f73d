//! Simulator Python binding.
//!
//! Wraps [`ForwardingSimulator`] so a tracer written in Python can admit
//! instructions one at a time, or replay a whole trace file, and write the
//! end-of-run report.

use std::fs::File;
use std::io::{BufReader, BufWriter};

use pyo3::prelude::*;
use pyo3::types::PyDict;
use robscan_core::config::{Config, Profile};
use robscan_core::sim::{TraceReader, replay};
use robscan_core::window::ForwardingSimulator;

use crate::conversion::{
    admission_to_dict, config_error, json_to_descriptor, py_dict_to_config, py_dict_to_descriptor,
    trace_error,
};
use crate::stats::PyStats;

/// Python-exposed simulator: one instance per run.
#[pyclass(name = "Simulator")]
#[derive(Debug)]
pub struct PySimulator {
    inner: ForwardingSimulator,
}

#[pymethods]
impl PySimulator {
    /// Creates a simulator from a profile name and an optional config dict overlaid onto it.
    #[new]
    #[pyo3(signature = (config_dict=None, profile="full"))]
    fn new(py: Python<'_>, config_dict: Option<&Bound<'_, PyAny>>, profile: &str) -> PyResult<Self> {
        let base = Config::for_profile(profile.parse::<Profile>().map_err(config_error)?);
        let config = match config_dict {
            Some(dict) => py_dict_to_config(py, dict, &base)?,
            None => base,
        };
        let inner = ForwardingSimulator::new(config).map_err(config_error)?;
        Ok(Self { inner })
    }

    /// Admits one instruction record dict and returns the admission outcome.
    fn admit(&mut self, py: Python<'_>, record: &Bound<'_, PyAny>) -> PyResult<Py<PyDict>> {
        let desc = py_dict_to_descriptor(py, record)?;
        let admission = self.inner.admit(&desc);
        admission_to_dict(py, &admission)
    }

    /// Admits one JSON trace line.
    fn admit_json(&mut self, py: Python<'_>, line: &str) -> PyResult<Py<PyDict>> {
        let desc = json_to_descriptor(line)?;
        let admission = self.inner.admit(&desc);
        admission_to_dict(py, &admission)
    }

    /// Replays a JSON Lines trace file and returns the number of records admitted.
    fn replay(&mut self, path: &str) -> PyResult<u64> {
        let file = File::open(path)?;
        replay(&mut self.inner, TraceReader::new(BufReader::new(file))).map_err(trace_error)
    }

    /// Writes the report to `path`, or to the configured output path.
    #[pyo3(signature = (path=None))]
    fn write_report(&self, path: Option<&str>) -> PyResult<()> {
        let config = self.inner.config();
        let path = path.unwrap_or(&config.general.output);
        let file = File::create(path)?;
        self.inner
            .counters()
            .write_report(BufWriter::new(file), config.general.report_potential)?;
        Ok(())
    }

    /// Empties the window and zeroes the counters.
    fn reset(&mut self) {
        self.inner.reset();
    }

    /// Returns the effective configuration as a dict.
    fn config(&self, py: Python<'_>) -> PyResult<PyObject> {
        let json = serde_json::to_string(self.inner.config())
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
        let loads = py.import("json")?.getattr("loads")?;
        Ok(loads.call1((json,))?.unbind())
    }

    #[getter]
    fn stats(&self) -> PyStats {
        PyStats {
            inner: self.inner.counters().clone(),
        }
    }

    #[getter]
    fn window_len(&self) -> usize {
        self.inner.window().len()
    }

    #[getter]
    fn capacity(&self) -> usize {
        self.inner.window().capacity()
    }
}
