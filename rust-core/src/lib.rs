//! NQR Measurement Core - apodization and measurement panel logic
//! 
//! Window functions, apodization, measurement records with their file format and
//! the measurement panel state machine, with optional Python bindings for the host.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod functions;
pub mod apodization;
pub mod measurement;
pub mod panel;
#[cfg(feature = "python")]
pub mod python_bindings;

pub use functions::{FunctionRegistry, WindowFunction};
pub use apodization::{apply, compute_weights, Apodization, ApodizationError};
pub use measurement::Measurement;
pub use panel::{MeasurementController, MeasurementModel, ViewMode};
