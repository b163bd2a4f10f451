//! Measurement records and their on-disk format

pub mod record;
pub mod spectrum;
pub mod io;

pub use record::Measurement;
pub use spectrum::Spectrum;
pub use io::{load_measurement, save_measurement, with_extension, PersistenceError, FILE_EXTENSION};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasurementError {
    #[error("Time axis has {tdx} samples but signal has {tdy}")]
    LengthMismatch { tdx: usize, tdy: usize },

    #[error("A measurement needs at least 2 samples (found {0})")]
    TooFewSamples(usize),

    #[error("Time axis must be strictly increasing (index {0})")]
    NotIncreasing(usize),

    #[error("Time axis is not uniformly spaced (index {0})")]
    NonUniform(usize),

    #[error("Time axis contains a non-finite value (index {0})")]
    NonFinite(usize),

    #[error("Signal contains a non-finite sample (index {0})")]
    NonFiniteSignal(usize),
}
