//! Measurement record
//! 
//! Time-domain samples of one acquisition plus the frequencies it was taken at.
//! The frequency-domain view is derived on first access and cached.

use std::cell::OnceCell;

use num_complex::Complex64;

use super::spectrum::Spectrum;
use super::MeasurementError;

/// Relative tolerance on the sample spacing
const SPACING_TOLERANCE: f64 = 1e-6;

/// Single acquisition
#[derive(Debug, Clone)]
pub struct Measurement {
    name: String,

    /// Sample times in microseconds
    tdx: Vec<f64>,

    /// Complex amplitude per sample
    tdy: Vec<Complex64>,

    /// Target frequency in Hz
    target_frequency: f64,

    /// Intermediate frequency offset in Hz
    if_frequency: f64,

    spectrum: OnceCell<Spectrum>,
}

impl Measurement {
    /// Create a measurement, checking the time axis
    /// 
    /// # Arguments
    /// * `tdx` - Sample times in µs, strictly increasing and uniformly spaced
    /// * `tdy` - Complex samples, same length as `tdx`
    /// * `target_frequency` - Target frequency in Hz
    /// * `if_frequency` - IF offset in Hz
    pub fn new(
        tdx: Vec<f64>,
        tdy: Vec<Complex64>,
        target_frequency: f64,
        if_frequency: f64,
    ) -> Result<Self, MeasurementError> {
        validate_axis(&tdx, &tdy)?;

        Ok(Self {
            name: String::from("Measurement"),
            tdx,
            tdy,
            target_frequency,
            if_frequency,
            spectrum: OnceCell::new(),
        })
    }

    /// Builder-style name override
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn tdx(&self) -> &[f64] {
        &self.tdx
    }

    pub fn tdy(&self) -> &[Complex64] {
        &self.tdy
    }

    pub fn target_frequency(&self) -> f64 {
        self.target_frequency
    }

    pub fn if_frequency(&self) -> f64 {
        self.if_frequency
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.tdx.len()
    }

    /// Always false for a constructed measurement, kept for the `len` convention
    pub fn is_empty(&self) -> bool {
        self.tdx.is_empty()
    }

    /// Time between first and last sample in µs
    pub fn duration_us(&self) -> f64 {
        self.tdx[self.tdx.len() - 1] - self.tdx[0]
    }

    /// Sample spacing in µs
    pub fn resolution_us(&self) -> f64 {
        self.tdx[1] - self.tdx[0]
    }

    /// Shifted frequency-domain view, computed on first use
    pub fn spectrum(&self) -> &Spectrum {
        self.spectrum
            .get_or_init(|| Spectrum::compute(&self.tdy, self.resolution_us() * 1e-6))
    }

    /// Frequency offsets in Hz
    pub fn fdx(&self) -> &[f64] {
        &self.spectrum().fdx
    }

    pub fn fdy(&self) -> &[Complex64] {
        &self.spectrum().fdy
    }

    /// Same time axis and metadata with a new signal
    /// 
    /// The cached spectrum is not carried over.
    pub fn with_signal(&self, tdy: Vec<Complex64>) -> Result<Self, MeasurementError> {
        Ok(Self::new(
            self.tdx.clone(),
            tdy,
            self.target_frequency,
            self.if_frequency,
        )?
        .with_name(self.name.clone()))
    }
}

impl PartialEq for Measurement {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.tdx == other.tdx
            && self.tdy == other.tdy
            && self.target_frequency == other.target_frequency
            && self.if_frequency == other.if_frequency
    }
}

fn validate_axis(tdx: &[f64], tdy: &[Complex64]) -> Result<(), MeasurementError> {
    if tdx.len() != tdy.len() {
        return Err(MeasurementError::LengthMismatch {
            tdx: tdx.len(),
            tdy: tdy.len(),
        });
    }
    if tdx.len() < 2 {
        return Err(MeasurementError::TooFewSamples(tdx.len()));
    }
    if let Some(i) = tdx.iter().position(|t| !t.is_finite()) {
        return Err(MeasurementError::NonFinite(i));
    }
    if let Some(i) = tdy.iter().position(|y| !y.is_finite()) {
        return Err(MeasurementError::NonFiniteSignal(i));
    }

    let step = tdx[1] - tdx[0];
    for i in 1..tdx.len() {
        let delta = tdx[i] - tdx[i - 1];
        if delta <= 0.0 {
            return Err(MeasurementError::NotIncreasing(i));
        }
        if (delta - step).abs() > step * SPACING_TOLERANCE {
            return Err(MeasurementError::NonUniform(i));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize, step: f64) -> Vec<f64> {
        (0..n).map(|k| k as f64 * step).collect()
    }

    #[test]
    fn test_valid_measurement() {
        let m = Measurement::new(ramp(11, 0.5), vec![Complex64::new(1.0, 0.0); 11], 83.56e6, 0.0)
            .unwrap();

        assert_eq!(m.len(), 11);
        assert_eq!(m.duration_us(), 5.0);
        assert_eq!(m.resolution_us(), 0.5);
        assert_eq!(m.target_frequency(), 83.56e6);
        assert_eq!(m.name(), "Measurement");
        assert_eq!(m.fdx().len(), 11);
        assert_eq!(m.fdy().len(), 11);
    }

    #[test]
    fn test_axis_validation() {
        let ones = |n| vec![Complex64::new(1.0, 0.0); n];

        assert_eq!(
            Measurement::new(ramp(3, 1.0), ones(4), 0.0, 0.0),
            Err(MeasurementError::LengthMismatch { tdx: 3, tdy: 4 })
        );
        assert_eq!(
            Measurement::new(vec![0.0], ones(1), 0.0, 0.0),
            Err(MeasurementError::TooFewSamples(1))
        );
        assert_eq!(
            Measurement::new(vec![0.0, 1.0, 1.0], ones(3), 0.0, 0.0),
            Err(MeasurementError::NotIncreasing(2))
        );
        assert_eq!(
            Measurement::new(vec![0.0, 1.0, 3.0], ones(3), 0.0, 0.0),
            Err(MeasurementError::NonUniform(2))
        );
        assert_eq!(
            Measurement::new(vec![0.0, f64::NAN, 2.0], ones(3), 0.0, 0.0),
            Err(MeasurementError::NonFinite(1))
        );

        let mut signal = ones(3);
        signal[2] = Complex64::new(1.0, f64::INFINITY);
        assert_eq!(
            Measurement::new(ramp(3, 1.0), signal, 0.0, 0.0),
            Err(MeasurementError::NonFiniteSignal(2))
        );
    }

    #[test]
    fn test_with_signal_keeps_metadata() {
        let m = Measurement::new(ramp(4, 1.0), vec![Complex64::new(1.0, 0.0); 4], 1e6, 2e3)
            .unwrap()
            .with_name("run 1");
        let _ = m.spectrum();

        let doubled = m
            .with_signal(m.tdy().iter().map(|y| y * 2.0).collect())
            .unwrap();

        assert_eq!(doubled.tdx(), m.tdx());
        assert_eq!(doubled.name(), "run 1");
        assert_eq!(doubled.if_frequency(), 2e3);
        assert_eq!(doubled.tdy()[0], Complex64::new(2.0, 0.0));
        assert!(m.with_signal(vec![Complex64::new(0.0, 0.0); 3]).is_err());
    }
}
