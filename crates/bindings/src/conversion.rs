//! Python↔Rust conversion.
//!
//! Python dicts are converted through JSON, so Python callers, the CLI and
//! trace files share one schema.

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use robscan_core::common::{ConfigError, TraceError};
use robscan_core::config::Config;
use robscan_core::isa::InstructionDescriptor;
use robscan_core::window::Admission;

/// Serializes a Python object with `json.dumps`.
fn dumps(py: Python<'_>, obj: &Bound<'_, PyAny>) -> PyResult<String> {
    let json = py.import("json")?;
    json.getattr("dumps")?.call1((obj,))?.extract()
}

/// Overlays a Python dict onto `base`.
///
/// Keys must match the Rust config structure (`general`, `window`, `policy`);
/// omitted keys keep the values of `base`.
///
/// # Errors
///
/// Returns `ValueError` if the dict does not fit the schema.
pub fn py_dict_to_config(py: Python<'_>, dict: &Bound<'_, PyAny>, base: &Config) -> PyResult<Config> {
    let json = dumps(py, dict)?;
    base.overlay(&json).map_err(config_error)
}

/// Converts a Python dict such as `{"id": 1, "category": "binary", "operands": [{"reg": 0}]}`.
///
/// # Errors
///
/// Returns `ValueError` if the dict is not a valid instruction record.
pub fn py_dict_to_descriptor(py: Python<'_>, dict: &Bound<'_, PyAny>) -> PyResult<InstructionDescriptor> {
    let json = dumps(py, dict)?;
    json_to_descriptor(&json)
}

/// Parses one trace line.
///
/// # Errors
///
/// Returns `ValueError` if the line is not a valid instruction record.
pub fn json_to_descriptor(json: &str) -> PyResult<InstructionDescriptor> {
    serde_json::from_str(json)
        .map_err(|e| PyValueError::new_err(format!("Invalid instruction record: {e}")))
}

/// Exports an admission outcome as a dict.
///
/// # Errors
///
/// Propagates dict insertion failures.
pub fn admission_to_dict(py: Python<'_>, admission: &Admission) -> PyResult<Py<PyDict>> {
    let d = PyDict::new(py);
    d.set_item("tag", admission.tag.0)?;
    d.set_item("bypassed", admission.bypassed)?;
    d.set_item("bindings", admission.bindings)?;
    d.set_item("relocated", admission.relocated)?;
    d.set_item("missed", admission.missed)?;
    Ok(d.unbind())
}

/// Maps a configuration error to `ValueError`.
pub fn config_error(e: ConfigError) -> PyErr {
    PyValueError::new_err(format!("Invalid config: {e}"))
}

/// Maps a trace error to `IOError` or `ValueError`.
pub fn trace_error(e: TraceError) -> PyErr {
    match e {
        TraceError::Io(io) => PyIOError::new_err(io.to_string()),
        parse @ TraceError::Parse { .. } => PyValueError::new_err(parse.to_string()),
    }
}
