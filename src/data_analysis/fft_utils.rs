// src/data_analysis/fft_utils.rs

use ndarray::Array1;
use realfft::num_complex::Complex64;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

use crate::error::{AnalysisError, Result};

/// Number of unique bins in the real FFT of an `n`-sample signal.
pub fn rfft_len(n: usize) -> usize {
    n / 2 + 1
}

/// Plans a forward real FFT of length `n`.
pub fn plan_forward(n: usize) -> Arc<dyn RealToComplex<f64>> {
    RealFftPlanner::<f64>::new().plan_fft_forward(n)
}

/// Runs a planned forward FFT. The input buffer is used as scratch and is overwritten.
pub fn fft_forward_with(
    plan: &Arc<dyn RealToComplex<f64>>,
    input: &mut [f64],
) -> Result<Vec<Complex64>> {
    if input.len() != plan.len() {
        return Err(AnalysisError::InvalidParameter(format!(
            "FFT input length {} does not match plan length {}",
            input.len(),
            plan.len()
        )));
    }
    let mut output = plan.make_output_vec();
    plan.process(input, &mut output)
        .map_err(|e| AnalysisError::InvalidParameter(format!("FFT forward processing failed: {}", e)))?;
    Ok(output)
}

/// Frequencies of the real FFT bins for an `n`-point transform at `sample_rate`.
pub fn rfft_frequencies(n: usize, sample_rate: f64) -> Array1<f64> {
    if n == 0 || sample_rate <= 0.0 {
        return Array1::zeros(0);
    }
    let step = sample_rate / n as f64;
    Array1::from_iter((0..rfft_len(n)).map(|k| k as f64 * step))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfft_frequencies_even_and_odd() {
        let even = rfft_frequencies(8, 8.0);
        assert_eq!(even.to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        let odd = rfft_frequencies(5, 10.0);
        assert_eq!(odd.to_vec(), vec![0.0, 2.0, 4.0]);
        assert!(rfft_frequencies(0, 10.0).is_empty());
    }

    #[test]
    fn test_fft_of_constant_is_dc_only() {
        let plan = plan_forward(16);
        let mut data = vec![2.0; 16];
        let spectrum = fft_forward_with(&plan, &mut data).unwrap();
        assert_eq!(spectrum.len(), 9);
        assert!((spectrum[0].re - 32.0).abs() < 1e-9);
        for bin in spectrum.iter().skip(1) {
            assert!(bin.norm() < 1e-9);
        }
    }

    #[test]
    fn test_plan_length_mismatch() {
        let plan = plan_forward(8);
        let mut input = vec![0.0; 4];
        assert!(fft_forward_with(&plan, &mut input).is_err());
    }
}
