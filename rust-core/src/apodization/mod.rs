//! Apodization: weighting a measurement's time-domain signal with a window function

pub mod weights;
pub mod engine;

pub use weights::{compute_weights, ApodizationRequest};
pub use engine::{apply, Apodization};

use thiserror::Error;

use crate::functions::FunctionError;
use crate::measurement::MeasurementError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApodizationError {
    #[error("Invalid window parameter {symbol} = {value} (expected {expected})")]
    InvalidParameter {
        symbol: String,
        value: f64,
        expected: String,
    },

    #[error("Invalid apodization domain: {0}")]
    Domain(String),

    #[error("Window function could not be evaluated: {0}")]
    Evaluation(FunctionError),
}

impl From<FunctionError> for ApodizationError {
    fn from(err: FunctionError) -> Self {
        match err {
            FunctionError::InvalidParameter {
                symbol,
                value,
                expected,
            } => ApodizationError::InvalidParameter {
                symbol,
                value,
                expected,
            },
            other => ApodizationError::Evaluation(other),
        }
    }
}

impl From<MeasurementError> for ApodizationError {
    fn from(err: MeasurementError) -> Self {
        ApodizationError::Domain(err.to_string())
    }
}
