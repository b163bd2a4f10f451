//! Measurement panel state
//! 
//! Holds the view mode, the measurement history and the input field states.
//! Every mutation queues a `ModelChange` that the view drains to know what to redraw.

use crate::measurement::Measurement;

use super::config::PanelConfig;
use super::PanelError;

/// Which domain the plot shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Time-domain samples
    #[default]
    Time,
    /// Frequency-domain spectrum
    Fft,
}

impl ViewMode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Time => ViewMode::Fft,
            ViewMode::Fft => ViewMode::Time,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Time => "time",
            ViewMode::Fft => "fft",
        }
    }
}

/// Parameter input fields on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Frequency,
    Averages,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Frequency => "frequency",
            Field::Averages => "averages",
        }
    }
}

/// Text and validity of an input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputField {
    pub text: String,
    pub valid: bool,
}

impl InputField {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            valid: true,
        }
    }
}

/// Notification for the view about what changed
#[derive(Debug, Clone, PartialEq)]
pub enum ModelChange {
    ViewMode(ViewMode),
    /// History length after the change
    Measurements(usize),
    /// Index of the newly displayed measurement
    Displayed(usize),
    Busy(bool),
    ActiveSpectrometer(String),
    FieldState(Field),
}

/// State behind the measurement panel
#[derive(Debug, Clone)]
pub struct MeasurementModel {
    view_mode: ViewMode,
    measurements: Vec<Measurement>,
    displayed: Option<usize>,
    busy: bool,
    active_spectrometer: Option<String>,
    frequency: InputField,
    averages: InputField,
    changes: Vec<ModelChange>,
}

impl Default for MeasurementModel {
    fn default() -> Self {
        Self::new(&PanelConfig::default())
    }
}

impl MeasurementModel {
    /// Time view, empty history
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            view_mode: ViewMode::Time,
            measurements: Vec::new(),
            displayed: None,
            busy: false,
            active_spectrometer: None,
            frequency: InputField::new(&config.frequency_text),
            averages: InputField::new(&config.averages_text),
            changes: Vec::new(),
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        self.changes.push(ModelChange::ViewMode(mode));
    }

    /// Flip between time and frequency view
    pub fn toggle_view_mode(&mut self) -> ViewMode {
        let mode = self.view_mode.toggled();
        self.set_view_mode(mode);
        mode
    }

    /// History, oldest first
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Append to history
    /// 
    /// # Returns
    /// Index of the new entry
    pub fn add_measurement(&mut self, measurement: Measurement) -> usize {
        self.measurements.push(measurement);
        self.changes
            .push(ModelChange::Measurements(self.measurements.len()));
        self.measurements.len() - 1
    }

    /// Append to history and display it
    pub fn add_and_display(&mut self, measurement: Measurement) -> usize {
        let index = self.add_measurement(measurement);
        self.displayed = Some(index);
        self.changes.push(ModelChange::Displayed(index));
        index
    }

    /// Display any entry of the history
    pub fn select_displayed(&mut self, index: usize) -> Result<(), PanelError> {
        if index >= self.measurements.len() {
            return Err(PanelError::NoSuchMeasurement(index));
        }
        self.displayed = Some(index);
        self.changes.push(ModelChange::Displayed(index));
        Ok(())
    }

    pub fn displayed_index(&self) -> Option<usize> {
        self.displayed
    }

    pub fn displayed_measurement(&self) -> Option<&Measurement> {
        self.displayed.and_then(|i| self.measurements.get(i))
    }

    /// Most recently appended measurement
    pub fn latest_measurement(&self) -> Option<&Measurement> {
        self.measurements.last()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn set_busy(&mut self, busy: bool) {
        if self.busy != busy {
            self.busy = busy;
            self.changes.push(ModelChange::Busy(busy));
        }
    }

    pub fn active_spectrometer(&self) -> Option<&str> {
        self.active_spectrometer.as_deref()
    }

    pub fn set_active_spectrometer(&mut self, name: &str) {
        self.active_spectrometer = Some(name.to_string());
        self.changes
            .push(ModelChange::ActiveSpectrometer(name.to_string()));
    }

    /// Status label text for the active spectrometer
    pub fn spectrometer_label(&self) -> String {
        match &self.active_spectrometer {
            Some(name) => format!("Active spectrometer: {}", name),
            None => "No spectrometer selected".to_string(),
        }
    }

    pub fn field(&self, field: Field) -> &InputField {
        match field {
            Field::Frequency => &self.frequency,
            Field::Averages => &self.averages,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut InputField {
        match field {
            Field::Frequency => &mut self.frequency,
            Field::Averages => &mut self.averages,
        }
    }

    /// Store new text for a field; validity is decided by the controller
    pub fn set_field_text(&mut self, field: Field, text: &str) {
        self.field_mut(field).text = text.to_string();
    }

    pub fn set_field_valid(&mut self, field: Field, valid: bool) {
        let entry = self.field_mut(field);
        if entry.valid != valid {
            entry.valid = valid;
            self.changes.push(ModelChange::FieldState(field));
        }
    }

    /// Drain queued change notifications
    pub fn take_changes(&mut self) -> Vec<ModelChange> {
        std::mem::take(&mut self.changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn measurement(name: &str) -> Measurement {
        Measurement::new(vec![0.0, 1.0], vec![Complex64::new(1.0, 0.0); 2], 0.0, 0.0)
            .unwrap()
            .with_name(name)
    }

    #[test]
    fn test_initial_state() {
        let model = MeasurementModel::default();
        assert_eq!(model.view_mode(), ViewMode::Time);
        assert!(model.measurements().is_empty());
        assert!(model.displayed_measurement().is_none());
        assert!(!model.is_busy());
        assert_eq!(model.field(Field::Averages).text, "1");
        assert_eq!(model.spectrometer_label(), "No spectrometer selected");
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut model = MeasurementModel::default();
        assert_eq!(model.toggle_view_mode(), ViewMode::Fft);
        assert_eq!(model.toggle_view_mode(), ViewMode::Time);
        assert_eq!(ViewMode::Fft.toggled(), ViewMode::Time);
        assert_eq!(
            model.take_changes(),
            vec![
                ModelChange::ViewMode(ViewMode::Fft),
                ModelChange::ViewMode(ViewMode::Time)
            ]
        );
        assert!(model.take_changes().is_empty());
    }

    #[test]
    fn test_history_and_selection() {
        let mut model = MeasurementModel::default();
        for name in ["m1", "m2", "m3"] {
            model.add_and_display(measurement(name));
        }

        let names: Vec<&str> = model.measurements().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["m1", "m2", "m3"]);
        assert_eq!(model.displayed_measurement().unwrap().name(), "m3");

        model.select_displayed(0).unwrap();
        assert_eq!(model.displayed_measurement().unwrap().name(), "m1");
        assert_eq!(model.latest_measurement().unwrap().name(), "m3");
        assert_eq!(model.measurements().len(), 3);

        assert_eq!(model.select_displayed(3), Err(PanelError::NoSuchMeasurement(3)));
        assert_eq!(model.displayed_index(), Some(0));
    }

    #[test]
    fn test_busy_and_fields_only_report_changes() {
        let mut model = MeasurementModel::default();
        model.set_busy(false);
        model.set_field_valid(Field::Frequency, true);
        assert!(model.take_changes().is_empty());

        model.set_busy(true);
        model.set_field_valid(Field::Frequency, false);
        assert_eq!(
            model.take_changes(),
            vec![ModelChange::Busy(true), ModelChange::FieldState(Field::Frequency)]
        );
    }
}
