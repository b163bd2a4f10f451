//! Applying a window to a measurement
//! 
//! The source measurement is never modified; every application yields a new
//! measurement so different windows can be tried on the same data.

use ndarray::{Array1, Zip};

use crate::functions::WindowFunction;
use crate::measurement::Measurement;

use super::weights::{compute_weights, ApodizationRequest};
use super::ApodizationError;

/// Apply `function` to a measurement's time-domain signal
/// 
/// # Returns
/// New measurement with the same time axis and frequencies and a weighted signal
pub fn apply(
    measurement: &Measurement,
    function: &WindowFunction,
) -> Result<Measurement, ApodizationError> {
    let request = ApodizationRequest::from_measurement(measurement);
    log::debug!("Resolution: {} s, duration: {} s", request.resolution, request.duration);

    let weights = compute_weights(function, request.duration, request.resolution)?;
    if weights.len() != measurement.len() {
        return Err(ApodizationError::Domain(format!(
            "{} weights for {} samples",
            weights.len(),
            measurement.len()
        )));
    }

    let weights = Array1::from_vec(weights);
    let mut tdy = Array1::from_vec(measurement.tdy().to_vec());
    Zip::from(&mut tdy)
        .and(&weights)
        .for_each(|y, &w| *y *= w);

    let mut apodized = measurement.with_signal(tdy.to_vec())?;
    apodized.set_name(format!("{} (apodized)", measurement.name()));
    Ok(apodized)
}

/// Apodization session bound to one measurement
/// 
/// Created whenever a measurement is picked for apodization; keeps the source
/// untouched so windows can be applied repeatedly.
#[derive(Debug, Clone)]
pub struct Apodization {
    source: Measurement,
    request: ApodizationRequest,
}

impl Apodization {
    pub fn new(source: Measurement) -> Self {
        let request = ApodizationRequest::from_measurement(&source);
        Self { source, request }
    }

    pub fn source(&self) -> &Measurement {
        &self.source
    }

    /// Duration of the source signal in seconds
    pub fn duration(&self) -> f64 {
        self.request.duration
    }

    /// Sample spacing of the source signal in seconds
    pub fn resolution(&self) -> f64 {
        self.request.resolution
    }

    /// Weights `function` would apply to the source
    pub fn weights(&self, function: &WindowFunction) -> Result<Vec<f64>, ApodizationError> {
        compute_weights(function, self.request.duration, self.request.resolution)
    }

    /// Apply `function` to the source measurement
    pub fn apply(&self, function: &WindowFunction) -> Result<Measurement, ApodizationError> {
        apply(&self.source, function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn constant(n: usize, step_us: f64) -> Measurement {
        let tdx = (0..n).map(|k| k as f64 * step_us).collect();
        Measurement::new(tdx, vec![Complex64::new(1.0, 1.0); n], 83.56e6, 0.1e6).unwrap()
    }

    #[test]
    fn test_apply_is_pure() {
        let m = constant(101, 0.1);
        let before_tdx = m.tdx().to_vec();
        let before_tdy = m.tdy().to_vec();

        let apodized = apply(&m, &WindowFunction::fid()).unwrap();

        assert_eq!(m.tdx(), before_tdx.as_slice());
        assert_eq!(m.tdy(), before_tdy.as_slice());
        assert_eq!(apodized.tdx(), m.tdx());
        assert_eq!(apodized.target_frequency(), 83.56e6);
        assert_eq!(apodized.if_frequency(), 0.1e6);
        assert_eq!(apodized.name(), "Measurement (apodized)");
    }

    #[test]
    fn test_fid_on_unit_signal() {
        // Duration 10 µs, T2* = 10 µs
        let m = constant(101, 0.1);
        let apodized = apply(&m, &WindowFunction::fid_with(10.0)).unwrap();

        let last = apodized.tdy()[100];
        let expected = (-1.0f64).exp();
        assert!((last.re - expected).abs() < 1e-12);
        assert!((last.im - expected).abs() < 1e-12);
        assert_eq!(apodized.tdy()[0], Complex64::new(1.0, 1.0));
    }

    #[test]
    fn test_invalid_window_leaves_source() {
        let m = constant(11, 1.0);
        let session = Apodization::new(m.clone());

        let mut fid = WindowFunction::fid();
        fid.set_parameter("T2star", 0.0).unwrap();

        assert!(matches!(
            session.apply(&fid),
            Err(ApodizationError::InvalidParameter { .. })
        ));
        assert_eq!(session.source(), &m);
    }

    #[test]
    fn test_session_repeated_windows() {
        let session = Apodization::new(constant(21, 0.5));
        assert!((session.duration() - 10e-6).abs() < 1e-18);
        assert!((session.resolution() - 0.5e-6).abs() < 1e-18);

        let fid = session.apply(&WindowFunction::fid()).unwrap();
        let gauss = session.apply(&WindowFunction::gaussian()).unwrap();
        assert_ne!(fid.tdy(), gauss.tdy());
        assert_eq!(session.weights(&WindowFunction::gaussian()).unwrap().len(), 21);

        // Gaussian over [-π, π] peaks mid-signal
        let mid = gauss.tdy()[10].re;
        assert!(gauss.tdy().iter().all(|y| y.re <= mid + 1e-12));
    }
}
