//! PyO3 bindings for the Python host application

use pyo3::prelude::*;

mod function_bindings;
mod panel_bindings;

/// Python module definition
#[pymodule]
fn nqr_measurement(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<function_bindings::PyWindowFunction>()?;
    m.add_class::<panel_bindings::PyMeasurementPanel>()?;
    
    m.add_function(wrap_pyfunction!(function_bindings::compute_weights, m)?)?;
    m.add_function(wrap_pyfunction!(function_bindings::apodize, m)?)?;
    
    Ok(())
}
