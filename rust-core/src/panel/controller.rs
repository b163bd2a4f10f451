//! Measurement panel controller
//! 
//! Reacts to user actions and host signals, updates the model and emits signals
//! back to the host. Every error ends here as a notification; nothing propagates
//! past the panel.

use std::path::{Path, PathBuf};

use crate::apodization::{Apodization, ApodizationError};
use crate::functions::{FunctionRegistry, WindowFunction};
use crate::measurement::{self, Measurement, PersistenceError};

use super::busy::{BusyIndicator, Dismissal};
use super::config::PanelConfig;
use super::model::{Field, MeasurementModel, ViewMode};
use super::signals::{InboundSignal, OutboundSignal, Severity, SignalBus, SignalPayload};
use super::PanelError;

pub struct MeasurementController<B: SignalBus> {
    config: PanelConfig,
    model: MeasurementModel,
    busy: BusyIndicator,
    registry: FunctionRegistry,
    bus: B,
}

impl<B: SignalBus> MeasurementController<B> {
    pub fn new(config: PanelConfig, bus: B) -> Self {
        let model = MeasurementModel::new(&config);
        Self {
            config,
            model,
            busy: BusyIndicator::new(),
            registry: FunctionRegistry::default(),
            bus,
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn model(&self) -> &MeasurementModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut MeasurementModel {
        &mut self.model
    }

    pub fn busy_indicator(&self) -> &BusyIndicator {
        &self.busy
    }

    pub fn busy_indicator_mut(&mut self) -> &mut BusyIndicator {
        &mut self.busy
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.registry
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        log::debug!("Notification ({}): {}", severity.as_str(), message);
        self.bus.emit(OutboundSignal::notification(severity, message));
    }

    /// Decode and handle a key/value signal from the host
    /// 
    /// # Returns
    /// Whether the key was handled
    pub fn process_signal(&mut self, key: &str, payload: SignalPayload) -> bool {
        match InboundSignal::from_key_value(key, payload) {
            Some(signal) => {
                self.handle_signal(signal);
                true
            }
            None => false,
        }
    }

    pub fn handle_signal(&mut self, signal: InboundSignal) {
        log::debug!("Received signal '{}'", signal.key());
        match signal {
            InboundSignal::MeasurementData(measurement) => {
                log::debug!("Received single measurement.");
                self.model.add_and_display(measurement);
                self.finish_acquisition();
            }
            InboundSignal::MeasurementError => {
                log::debug!("Received measurement error.");
                self.finish_acquisition();
                self.notify(
                    Severity::Error,
                    "Measurement failed. Check the spectrometer connection and settings.",
                );
            }
            InboundSignal::FailureSetFrequency(value) => {
                self.reject_field(Field::Frequency, &value);
            }
            InboundSignal::FailureSetAverages(value) => {
                self.reject_field(Field::Averages, &value);
            }
            InboundSignal::ActiveSpectrometerChanged(name) => {
                self.model.set_active_spectrometer(&name);
            }
        }
    }

    /// Mark a field invalid if the rejected value is still what the field holds
    fn reject_field(&mut self, field: Field, value: &str) {
        if self.model.field(field).text == value {
            log::debug!("Spectrometer rejected {} '{}'", field.label(), value);
            self.model.set_field_valid(field, false);
        } else {
            log::debug!(
                "Ignoring stale {} failure for '{}' (field holds '{}')",
                field.label(),
                value,
                self.model.field(field).text
            );
        }
    }

    fn finish_acquisition(&mut self) -> Dismissal {
        self.model.set_busy(false);
        self.busy.dismiss()
    }

    /// Flip between time and frequency view
    pub fn change_view_mode(&mut self) -> ViewMode {
        log::debug!("Changing view mode.");
        let mode = self.model.toggle_view_mode();
        log::debug!("View mode changed to: {}", mode.as_str());
        mode
    }

    /// Frequency field edited (MHz)
    pub fn set_frequency(&mut self, text: &str) {
        log::debug!("Setting frequency to: {}", text);
        self.model.set_field_text(Field::Frequency, text);

        match parse_frequency_mhz(text) {
            Some(mhz) => {
                self.model.set_field_valid(Field::Frequency, true);
                self.bus.emit(OutboundSignal::SetFrequency(mhz * 1e6));
            }
            None => {
                log::debug!("Invalid frequency '{}'", text);
                self.model.set_field_valid(Field::Frequency, false);
            }
        }
    }

    /// Averages field edited
    pub fn set_averages(&mut self, text: &str) {
        log::debug!("Setting averages to: {}", text);
        self.model.set_field_text(Field::Averages, text);

        match parse_averages(text) {
            Some(averages) => {
                self.model.set_field_valid(Field::Averages, true);
                self.bus.emit(OutboundSignal::SetAverages(averages.to_string()));
            }
            None => {
                log::debug!("Invalid averages '{}'", text);
                self.model.set_field_valid(Field::Averages, false);
            }
        }
    }

    /// Ask the host to start an acquisition
    /// 
    /// # Returns
    /// Whether the request was sent
    pub fn start_measurement(&mut self) -> bool {
        log::debug!("Start measurement clicked");
        let invalid: Vec<&str> = [Field::Frequency, Field::Averages]
            .iter()
            .filter(|f| !self.model.field(**f).valid)
            .map(|f| f.label())
            .collect();

        if !invalid.is_empty() {
            let message = format!(
                "Please enter a valid {} before starting a measurement.",
                invalid.join(" and ")
            );
            self.notify(Severity::Warning, message);
            return false;
        }

        self.busy.show();
        self.model.set_busy(true);
        self.bus.emit(OutboundSignal::StartMeasurement);
        true
    }

    /// Display an earlier measurement
    pub fn select_measurement(&mut self, index: usize) -> Result<(), PanelError> {
        self.model.select_displayed(index)
    }

    /// Apodization session for the displayed measurement
    pub fn apodization_session(&self) -> Result<Apodization, PanelError> {
        self.model
            .displayed_measurement()
            .cloned()
            .map(Apodization::new)
            .ok_or(PanelError::NoMeasurement)
    }

    /// Apodize the displayed measurement; the result is appended and displayed
    /// 
    /// # Returns
    /// History index of the apodized measurement, `None` if it failed
    pub fn apodize(&mut self, function: &WindowFunction) -> Option<usize> {
        let session = match self.apodization_session() {
            Ok(session) => session,
            Err(err) => {
                self.notify(Severity::Warning, err.to_string());
                return None;
            }
        };

        match session.apply(function) {
            Ok(apodized) => {
                log::info!("Applied {} apodization to '{}'", function.name(), session.source().name());
                Some(self.model.add_and_display(apodized))
            }
            Err(err) => {
                log::warn!("Apodization failed: {}", err);
                self.notify(Severity::Error, apodization_message(&err));
                None
            }
        }
    }

    /// Apodize with a registered function and parameter overrides
    pub fn apodize_with(&mut self, name: &str, parameters: &[(&str, f64)]) -> Option<usize> {
        let function = self.registry.create(name).and_then(|mut f| {
            for (symbol, value) in parameters {
                f.set_parameter(symbol, *value)?;
            }
            Ok(f)
        });

        match function {
            Ok(function) => self.apodize(&function),
            Err(err) => {
                self.notify(Severity::Error, err.to_string());
                None
            }
        }
    }

    /// Save the latest measurement
    /// 
    /// The configured extension is appended when missing.
    /// 
    /// # Returns
    /// Path written, `None` on failure
    pub fn save_measurement(&mut self, path: &Path) -> Option<PathBuf> {
        let Some(latest) = self.model.latest_measurement() else {
            self.notify(Severity::Warning, "There is no measurement to save.");
            return None;
        };

        let path = measurement::with_extension(path, &self.config.file_extension);
        match measurement::save_measurement(latest, &path) {
            Ok(()) => Some(path),
            Err(err) => {
                let message = persistence_message(&err);
                self.notify(Severity::Error, message);
                None
            }
        }
    }

    /// Load a measurement file, append it and display it
    /// 
    /// # Returns
    /// History index of the loaded measurement, `None` on failure
    pub fn load_measurement(&mut self, path: &Path) -> Option<usize> {
        match measurement::load_measurement(path) {
            Ok(loaded) => Some(self.model.add_and_display(loaded)),
            Err(err) => {
                log::warn!("Loading {} failed: {}", path.display(), err);
                let message = persistence_message(&err);
                self.notify(Severity::Error, message);
                None
            }
        }
    }

    /// Append a measurement produced elsewhere and display it
    pub fn add_measurement(&mut self, measurement: Measurement) -> usize {
        self.model.add_and_display(measurement)
    }
}

/// Frequency text in MHz; must be a positive finite number
fn parse_frequency_mhz(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Averages text; must be a positive integer
fn parse_averages(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

fn apodization_message(err: &ApodizationError) -> String {
    match err {
        ApodizationError::InvalidParameter {
            symbol,
            value,
            expected,
        } => format!(
            "Apodization parameter {} = {} is invalid (must be {}).",
            symbol, value, expected
        ),
        ApodizationError::Domain(reason) => {
            format!("The measurement cannot be apodized: {}.", reason)
        }
        ApodizationError::Evaluation(err) => {
            format!("The apodization function could not be evaluated: {}.", err)
        }
    }
}

fn persistence_message(err: &PersistenceError) -> String {
    match err {
        PersistenceError::NotFound(path) => format!("File not found: {}", path.display()),
        PersistenceError::Malformed(_) => {
            "The file is not a valid measurement file (JSON decode error).".to_string()
        }
        PersistenceError::MissingKey(key) => {
            format!("The measurement file is missing the '{}' entry.", key)
        }
        PersistenceError::Invalid(err) => {
            format!("The measurement file contains inconsistent data: {}", err)
        }
        PersistenceError::Io { path, source } => {
            format!("Could not access {}: {}", path.display(), source)
        }
    }
}
