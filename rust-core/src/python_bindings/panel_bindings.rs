//! Python bindings for the measurement panel controller

use std::collections::HashMap;
use std::path::Path;

use pyo3::prelude::*;
use numpy::{Complex64, PyReadonlyArray1};
use crate::measurement::Measurement;
use crate::panel::{MeasurementController, OutboundSignal, PanelConfig, PlotData, SignalPayload};
use super::function_bindings::{to_py_err, PyWindowFunction};

/// Measurement panel exposed to the host
/// 
/// Outbound signals are queued; the host drains them with `take_signals`.
#[pyclass(name = "MeasurementPanel")]
pub struct PyMeasurementPanel {
    controller: MeasurementController<Vec<OutboundSignal>>,
}

#[pymethods]
impl PyMeasurementPanel {
    /// Create a panel
    /// 
    /// Args:
    ///     config_path: Optional JSON panel configuration
    #[new]
    #[pyo3(signature = (config_path=None))]
    fn new(config_path: Option<&str>) -> PyResult<Self> {
        let config = match config_path {
            Some(path) => PanelConfig::from_json_file(Path::new(path)).map_err(to_py_err)?,
            None => PanelConfig::default(),
        };
        Ok(Self {
            controller: MeasurementController::new(config, Vec::new()),
        })
    }
    
    /// Handle a host signal whose payload is None or a string
    /// 
    /// Returns:
    ///     True if the key was handled
    #[pyo3(signature = (key, value=None))]
    fn process_signal(&mut self, key: &str, value: Option<String>) -> bool {
        let payload = match value {
            Some(text) => SignalPayload::Text(text),
            None => SignalPayload::None,
        };
        self.controller.process_signal(key, payload)
    }
    
    /// Handle `measurement_data`
    /// 
    /// Args:
    ///     tdx: Sample times in microseconds
    ///     tdy: Complex samples
    ///     target_frequency: Hz
    ///     if_frequency: Hz
    #[pyo3(signature = (tdx, tdy, target_frequency, if_frequency, name=None))]
    fn measurement_data(
        &mut self,
        tdx: PyReadonlyArray1<f64>,
        tdy: PyReadonlyArray1<Complex64>,
        target_frequency: f64,
        if_frequency: f64,
        name: Option<String>,
    ) -> PyResult<()> {
        let mut measurement = Measurement::new(
            tdx.as_array().to_vec(),
            tdy.as_array().to_vec(),
            target_frequency,
            if_frequency,
        )
        .map_err(to_py_err)?;
        if let Some(name) = name {
            measurement.set_name(name);
        }
        self.controller
            .process_signal("measurement_data", SignalPayload::Measurement(measurement));
        Ok(())
    }
    
    /// Drain queued outbound signals as (key, value) pairs
    fn take_signals(&mut self, py: Python<'_>) -> Vec<(String, PyObject)> {
        std::mem::take(self.controller.bus_mut())
            .into_iter()
            .map(|signal| {
                let key = signal.key().to_string();
                let value = match signal {
                    OutboundSignal::StartMeasurement => py.None(),
                    OutboundSignal::SetFrequency(hz) => hz.into_py(py),
                    OutboundSignal::SetAverages(text) => text.into_py(py),
                    OutboundSignal::Notification { severity, message } => {
                        vec![severity.as_str().to_string(), message].into_py(py)
                    }
                };
                (key, value)
            })
            .collect()
    }
    
    fn set_frequency(&mut self, text: &str) {
        self.controller.set_frequency(text);
    }
    
    fn set_averages(&mut self, text: &str) {
        self.controller.set_averages(text);
    }
    
    fn start_measurement(&mut self) -> bool {
        self.controller.start_measurement()
    }
    
    /// Returns:
    ///     New view mode, "time" or "fft"
    fn change_view_mode(&mut self) -> String {
        self.controller.change_view_mode().as_str().to_string()
    }
    
    fn view_mode(&self) -> String {
        self.controller.model().view_mode().as_str().to_string()
    }
    
    /// Indicator fade-in finished
    fn animation_finished(&mut self) {
        self.controller.busy_indicator_mut().animation_finished();
    }
    
    fn is_busy(&self) -> bool {
        self.controller.model().is_busy()
    }
    
    fn field_valid(&self, field: &str) -> PyResult<bool> {
        use crate::panel::Field;
        let field = match field {
            "frequency" => Field::Frequency,
            "averages" => Field::Averages,
            other => return Err(to_py_err(format!("unknown field '{}'", other))),
        };
        Ok(self.controller.model().field(field).valid)
    }
    
    fn spectrometer_label(&self) -> String {
        self.controller.model().spectrometer_label()
    }
    
    fn measurement_count(&self) -> usize {
        self.controller.model().measurements().len()
    }
    
    fn displayed_index(&self) -> Option<usize> {
        self.controller.model().displayed_index()
    }
    
    fn select_measurement(&mut self, index: usize) -> PyResult<()> {
        self.controller.select_measurement(index).map_err(to_py_err)
    }
    
    /// Apodize the displayed measurement with a window function object
    fn apodize(&mut self, function: PyRef<PyWindowFunction>) -> Option<usize> {
        self.controller.apodize(&function.function)
    }
    
    /// Apodize with a registered function by name
    #[pyo3(signature = (name, parameters=None))]
    fn apodize_with(&mut self, name: &str, parameters: Option<HashMap<String, f64>>) -> Option<usize> {
        let parameters = parameters.unwrap_or_default();
        let overrides: Vec<(&str, f64)> = parameters
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        self.controller.apodize_with(name, &overrides)
    }
    
    /// Save the latest measurement; returns the written path
    fn save_measurement(&mut self, path: &str) -> Option<String> {
        self.controller
            .save_measurement(Path::new(path))
            .map(|p| p.display().to_string())
    }
    
    fn load_measurement(&mut self, path: &str) -> Option<usize> {
        self.controller.load_measurement(Path::new(path))
    }
    
    /// Plot data for the displayed measurement
    /// 
    /// Returns:
    ///     (x, [(label, y), ...], x_label, y_label) or None
    fn plot_data(&self) -> Option<(Vec<f64>, Vec<(String, Vec<f64>)>, String, String)> {
        let style = &self.controller.config().plot_style;
        PlotData::derive(self.controller.model(), style).map(|plot| {
            let traces = plot
                .traces
                .into_iter()
                .map(|t| (t.label.to_string(), t.y))
                .collect();
            (plot.x, traces, plot.labels.x, plot.labels.y)
        })
    }
}
