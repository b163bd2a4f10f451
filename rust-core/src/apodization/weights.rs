//! Weight generation for apodization
//! 
//! Produces one real weight per time-domain sample from a window function.

use crate::functions::WindowFunction;
use crate::measurement::Measurement;

use super::ApodizationError;

/// Absolute tolerance on duration / resolution being a whole number
const RATIO_TOLERANCE: f64 = 1e-6;

/// Largest number of resolution steps a single request may span
pub const MAX_STEPS: usize = 1 << 24;

/// Duration and sample spacing of one measurement, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApodizationRequest {
    pub duration: f64,
    pub resolution: f64,
}

impl ApodizationRequest {
    /// Derive the request from a measurement's time axis (µs → s)
    pub fn from_measurement(measurement: &Measurement) -> Self {
        Self {
            duration: measurement.duration_us() * 1e-6,
            resolution: measurement.resolution_us() * 1e-6,
        }
    }

    /// Number of resolution steps in the duration
    /// 
    /// # Returns
    /// `duration / resolution` as an integer, or a domain error if either is
    /// non-positive, the resolution does not divide the duration, or the step
    /// count exceeds `MAX_STEPS`
    pub fn steps(&self) -> Result<usize, ApodizationError> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(ApodizationError::Domain(format!(
                "duration must be positive (got {} s)",
                self.duration
            )));
        }
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(ApodizationError::Domain(format!(
                "resolution must be positive (got {} s)",
                self.resolution
            )));
        }

        let ratio = self.duration / self.resolution;
        if !(ratio <= MAX_STEPS as f64 + 0.5) {
            return Err(ApodizationError::Domain(format!(
                "duration {} s at resolution {} s needs more than {} steps",
                self.duration, self.resolution, MAX_STEPS
            )));
        }
        let steps = ratio.round();
        // Accumulated rounding in long time axes grows with the step count
        let tolerance = RATIO_TOLERANCE.max(ratio * 1e-9);
        if steps < 1.0 || (ratio - steps).abs() > tolerance {
            return Err(ApodizationError::Domain(format!(
                "resolution {} s does not divide duration {} s",
                self.resolution, self.duration
            )));
        }

        Ok(steps as usize)
    }
}

/// Compute apodization weights
/// 
/// The window is evaluated at `duration / resolution` evenly spaced points covering
/// its whole domain, endpoints included. The last weight is then repeated so the
/// result has one weight per sample of a measurement spanning `duration`.
/// 
/// # Arguments
/// * `function` - Window function
/// * `duration` - Signal duration in seconds
/// * `resolution` - Sample spacing in seconds
/// 
/// # Returns
/// `duration / resolution + 1` weights
pub fn compute_weights(
    function: &WindowFunction,
    duration: f64,
    resolution: f64,
) -> Result<Vec<f64>, ApodizationError> {
    let request = ApodizationRequest {
        duration,
        resolution,
    };
    let steps = request.steps()?;
    function.validate()?;

    let mut weights = function.pulse_amplitude(duration, steps)?;
    if let Some(i) = weights.iter().position(|w| !w.is_finite()) {
        return Err(ApodizationError::Domain(format!(
            "{} is not finite at sample {} ({})",
            function.name(),
            i,
            weights[i]
        )));
    }
    if let Some(&last) = weights.last() {
        weights.push(last);
    }

    log::debug!(
        "Computed {} {} weights (duration {} s, resolution {} s)",
        weights.len(),
        function.name(),
        duration,
        resolution
    );

    Ok(weights)
}
