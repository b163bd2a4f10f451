//! Frequency-domain view of a measurement
//! 
//! Complex FFT of the time-domain signal, both axis and spectrum fft-shifted so that
//! the zero-offset bin sits in the middle.

use num_complex::Complex64;
use rustfft::FftPlanner;

/// Shifted frequency axis and spectrum
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Frequency offsets in Hz, ascending
    pub fdx: Vec<f64>,

    /// Complex spectrum, aligned with `fdx`
    pub fdy: Vec<Complex64>,
}

impl Spectrum {
    /// Compute the spectrum of a uniformly sampled signal
    /// 
    /// # Arguments
    /// * `tdy` - Complex time-domain samples
    /// * `dwell_s` - Sample spacing in seconds
    pub fn compute(tdy: &[Complex64], dwell_s: f64) -> Self {
        let n = tdy.len();
        if n == 0 {
            return Self {
                fdx: Vec::new(),
                fdy: Vec::new(),
            };
        }

        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(n);

        let mut buffer = tdy.to_vec();
        fft.process(&mut buffer);

        Self {
            fdx: fft_shift(frequency_axis(n, dwell_s)),
            fdy: fft_shift(buffer),
        }
    }

    /// Magnitude |X[k]| of each bin
    pub fn magnitude(&self) -> Vec<f64> {
        self.fdy.iter().map(|c| c.norm()).collect()
    }

    /// Index of the bin with the largest magnitude
    pub fn peak_bin(&self) -> Option<usize> {
        self.fdy
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm().total_cmp(&b.norm()))
            .map(|(k, _)| k)
    }
}

/// Unshifted FFT bin frequencies in Hz
/// 
/// Bins 0..=(n-1)/2 are non-negative, the rest wrap to negative frequencies.
pub fn frequency_axis(n: usize, dwell_s: f64) -> Vec<f64> {
    let scale = 1.0 / (n as f64 * dwell_s);
    let positive = (n - 1) / 2 + 1;
    (0..n)
        .map(|k| {
            if k < positive {
                k as f64 * scale
            } else {
                (k as f64 - n as f64) * scale
            }
        })
        .collect()
}

/// Move the zero-frequency bin to the centre
pub fn fft_shift<T>(mut values: Vec<T>) -> Vec<T> {
    let half = values.len() / 2;
    values.rotate_right(half);
    values
}
