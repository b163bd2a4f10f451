//! Signals exchanged with the host application
//! 
//! The host routes key/value pairs between modules. Inbound keys this panel reacts to
//! and outbound keys it emits are typed here.

use crate::measurement::Measurement;

/// Notification severity shown by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

/// Value carried by an inbound signal
#[derive(Debug, Clone, PartialEq)]
pub enum SignalPayload {
    None,
    Text(String),
    Measurement(Measurement),
}

/// Signals from the host this panel handles
#[derive(Debug, Clone, PartialEq)]
pub enum InboundSignal {
    /// Acquisition finished with data
    MeasurementData(Measurement),

    /// Acquisition failed
    MeasurementError,

    /// Spectrometer rejected the frequency text
    FailureSetFrequency(String),

    /// Spectrometer rejected the averages text
    FailureSetAverages(String),

    /// Name of the newly active spectrometer
    ActiveSpectrometerChanged(String),
}

impl InboundSignal {
    /// Decode a key/value pair from the host
    /// 
    /// # Returns
    /// `None` for keys this panel does not handle or payloads of the wrong kind
    pub fn from_key_value(key: &str, payload: SignalPayload) -> Option<Self> {
        let signal = match (key, payload) {
            ("measurement_data", SignalPayload::Measurement(m)) => InboundSignal::MeasurementData(m),
            ("measurement_error", _) => InboundSignal::MeasurementError,
            ("failure_set_frequency", SignalPayload::Text(v)) => InboundSignal::FailureSetFrequency(v),
            ("failure_set_averages", SignalPayload::Text(v)) => InboundSignal::FailureSetAverages(v),
            ("active_spectrometer_changed", SignalPayload::Text(v)) => {
                InboundSignal::ActiveSpectrometerChanged(v)
            }
            (key, payload) => {
                log::debug!("Ignoring signal '{}' with payload {:?}", key, payload_kind(&payload));
                return None;
            }
        };
        Some(signal)
    }

    pub fn key(&self) -> &'static str {
        match self {
            InboundSignal::MeasurementData(_) => "measurement_data",
            InboundSignal::MeasurementError => "measurement_error",
            InboundSignal::FailureSetFrequency(_) => "failure_set_frequency",
            InboundSignal::FailureSetAverages(_) => "failure_set_averages",
            InboundSignal::ActiveSpectrometerChanged(_) => "active_spectrometer_changed",
        }
    }
}

fn payload_kind(payload: &SignalPayload) -> &'static str {
    match payload {
        SignalPayload::None => "none",
        SignalPayload::Text(_) => "text",
        SignalPayload::Measurement(_) => "measurement",
    }
}

/// Signals this panel sends to the host
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundSignal {
    /// Ask the spectrometer to acquire
    StartMeasurement,

    /// Frequency in Hz
    SetFrequency(f64),

    /// Number of averages, as text
    SetAverages(String),

    /// User-facing message
    Notification { severity: Severity, message: String },
}

impl OutboundSignal {
    pub fn key(&self) -> &'static str {
        match self {
            OutboundSignal::StartMeasurement => "start_measurement",
            OutboundSignal::SetFrequency(_) => "set_frequency",
            OutboundSignal::SetAverages(_) => "set_averages",
            OutboundSignal::Notification { .. } => "notification",
        }
    }

    pub fn notification(severity: Severity, message: impl Into<String>) -> Self {
        OutboundSignal::Notification {
            severity,
            message: message.into(),
        }
    }
}

/// Outbound channel to the host
pub trait SignalBus {
    fn emit(&mut self, signal: OutboundSignal);
}

/// Collects signals for the host to drain
impl SignalBus for Vec<OutboundSignal> {
    fn emit(&mut self, signal: OutboundSignal) {
        self.push(signal);
    }
}
