//! Python bindings for window functions and apodization

use pyo3::prelude::*;
use pyo3::exceptions::PyValueError;
use numpy::{Complex64, PyArray1, PyReadonlyArray1};
use crate::apodization;
use crate::functions::{Domain, FunctionRegistry, WindowFunction};
use crate::measurement::Measurement;

/// Window function exposed to Python
#[pyclass(name = "WindowFunction")]
#[derive(Clone)]
pub struct PyWindowFunction {
    pub(crate) function: WindowFunction,
}

#[pymethods]
impl PyWindowFunction {
    /// Exponential FID window exp(-x / T2star)
    /// 
    /// Args:
    ///     t2star: Decay constant in microseconds
    #[staticmethod]
    #[pyo3(signature = (t2star=10.0))]
    fn fid(t2star: f64) -> Self {
        Self {
            function: WindowFunction::fid_with(t2star),
        }
    }
    
    /// Gaussian window over [-π, π]
    #[staticmethod]
    #[pyo3(signature = (mu=0.0, sigma=1.0))]
    fn gaussian(mu: f64, sigma: f64) -> PyResult<Self> {
        let mut function = WindowFunction::gaussian();
        function.set_parameter("mu", mu).map_err(to_py_err)?;
        function.set_parameter("sigma", sigma).map_err(to_py_err)?;
        Ok(Self { function })
    }
    
    /// Custom window from an expression in x
    /// 
    /// Args:
    ///     expression: e.g. "exp(-x^2 / a)"
    ///     start_x, end_x: Interval the signal duration maps onto;
    ///         omit both to use the elapsed time in microseconds as x
    #[staticmethod]
    #[pyo3(signature = (expression, start_x=None, end_x=None))]
    fn custom(expression: &str, start_x: Option<f64>, end_x: Option<f64>) -> PyResult<Self> {
        let domain = match (start_x, end_x) {
            (Some(start_x), Some(end_x)) => Domain::Interval { start_x, end_x },
            (None, None) => Domain::Time,
            _ => return Err(PyValueError::new_err("start_x and end_x must be given together")),
        };
        let function = WindowFunction::custom(expression, &[], domain).map_err(to_py_err)?;
        Ok(Self { function })
    }
    
    /// Fresh instance of a registered function ("FID", "Gaussian", "Custom")
    #[staticmethod]
    fn by_name(name: &str) -> PyResult<Self> {
        let function = FunctionRegistry::default().create(name).map_err(to_py_err)?;
        Ok(Self { function })
    }
    
    /// Names of the registered functions
    #[staticmethod]
    fn names() -> Vec<String> {
        FunctionRegistry::default()
            .names()
            .into_iter()
            .map(String::from)
            .collect()
    }
    
    fn name(&self) -> String {
        self.function.name().to_string()
    }
    
    fn expression(&self) -> String {
        self.function.expression()
    }
    
    /// List of (name, symbol, value)
    fn parameters(&self) -> Vec<(String, String, f64)> {
        self.function
            .parameters()
            .into_iter()
            .map(|p| (p.name.clone(), p.symbol.clone(), p.value))
            .collect()
    }
    
    fn set_parameter(&mut self, symbol: &str, value: f64) -> PyResult<()> {
        self.function.set_parameter(symbol, value).map_err(to_py_err)
    }
    
    fn evaluate(&self, x: f64) -> PyResult<f64> {
        self.function.evaluate(x).map_err(to_py_err)
    }
}

/// Apodization weights for a signal
/// 
/// Args:
///     function: Window function
///     duration: Signal duration in seconds
///     resolution: Sample spacing in seconds
/// 
/// Returns:
///     numpy array with duration / resolution + 1 weights
#[pyfunction]
pub fn compute_weights<'py>(
    py: Python<'py>,
    function: PyRef<PyWindowFunction>,
    duration: f64,
    resolution: f64,
) -> PyResult<&'py PyArray1<f64>> {
    let weights = apodization::compute_weights(&function.function, duration, resolution)
        .map_err(to_py_err)?;
    Ok(PyArray1::from_vec(py, weights))
}

/// Apodize a time-domain signal
/// 
/// Args:
///     tdx: Sample times in microseconds
///     tdy: Complex samples
///     function: Window function
/// 
/// Returns:
///     Weighted copy of tdy
#[pyfunction]
pub fn apodize<'py>(
    py: Python<'py>,
    tdx: PyReadonlyArray1<f64>,
    tdy: PyReadonlyArray1<Complex64>,
    function: PyRef<PyWindowFunction>,
) -> PyResult<&'py PyArray1<Complex64>> {
    let measurement = Measurement::new(
        tdx.as_array().to_vec(),
        tdy.as_array().to_vec(),
        0.0,
        0.0,
    )
    .map_err(to_py_err)?;
    let apodized = apodization::apply(&measurement, &function.function).map_err(to_py_err)?;
    Ok(PyArray1::from_slice(py, apodized.tdy()))
}

pub(crate) fn to_py_err<E: std::fmt::Display>(err: E) -> PyErr {
    PyValueError::new_err(err.to_string())
}
