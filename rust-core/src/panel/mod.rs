//! Measurement panel: state, host signals and the controller tying them together

pub mod config;
pub mod model;
pub mod signals;
pub mod busy;
pub mod plot;
pub mod controller;

pub use config::{AxisLabels, ConfigError, PanelConfig, PlotStyle};
pub use model::{Field, InputField, MeasurementModel, ModelChange, ViewMode};
pub use signals::{InboundSignal, OutboundSignal, Severity, SignalBus, SignalPayload};
pub use busy::{BusyIndicator, Dismissal, IndicatorState};
pub use plot::{PlotData, PlotView, Renderer, Trace};
pub use controller::MeasurementController;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PanelError {
    #[error("No measurement at index {0}")]
    NoSuchMeasurement(usize),

    #[error("No measurement is displayed")]
    NoMeasurement,
}
