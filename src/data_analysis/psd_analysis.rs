// src/data_analysis/psd_analysis.rs

use log::info;
use ndarray::Array1;

use crate::axis_names::{AXIS_COUNT, AXIS_NAMES};
use crate::data_analysis::spectral_analysis::{welch_psd, WelchConfig, WelchEstimate};
use crate::data_input::accel_data::AccelSamples;
use crate::error::{AnalysisError, Result};

/// Per-axis and combined spectra plus the dominant vibration mode.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Bin centres shared by every spectrum, 0 to fs/2.
    pub frequencies: Array1<f64>,
    pub psd_x: Array1<f64>,
    pub psd_y: Array1<f64>,
    pub psd_z: Array1<f64>,
    /// Elementwise sum of the three axis spectra.
    pub psd_total: Array1<f64>,
    /// Frequency of the largest combined power.
    pub mode_1_freq: f64,
    pub mode_1_index: usize,
    pub sampling_rate: f64,
    pub sample_count: usize,
    /// Segment length and count actually used by the estimator.
    pub nperseg: usize,
    pub segments: usize,
}

impl AnalysisResult {
    pub fn axis_psd(&self, axis: usize) -> &Array1<f64> {
        match axis {
            0 => &self.psd_x,
            1 => &self.psd_y,
            2 => &self.psd_z,
            _ => panic!("Invalid axis index: {}", axis),
        }
    }

    /// Combined power at the dominant mode.
    pub fn peak_psd(&self) -> f64 {
        self.psd_total[self.mode_1_index].abs()
    }

    /// Spacing between adjacent frequency bins in Hz.
    pub fn frequency_resolution(&self) -> f64 {
        self.sampling_rate / self.nperseg as f64
    }

    pub fn duration_s(&self) -> f64 {
        self.sample_count as f64 / self.sampling_rate
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

/// Index of the largest absolute value, first occurrence on ties.
///
/// NaN wins over every number so a corrupted spectrum still yields a result.
fn dominant_index(values: &Array1<f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.iter().map(|v| v.abs()).enumerate() {
        if v.is_nan() {
            return Some(i);
        }
        match best {
            Some((_, max)) if v <= max => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Estimates the PSD of each axis with Welch's method, sums them and locates the dominant mode.
///
/// The combined spectrum adds raw power across orthogonal axes without any
/// normalisation. The dominant mode is the first bin holding the largest
/// absolute combined power, or the first NaN bin if any.
pub fn compute_welch_psd(
    samples: &AccelSamples,
    sample_rate: f64,
    config: &WelchConfig,
) -> Result<AnalysisResult> {
    if samples.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let mut estimates: Vec<WelchEstimate> = Vec::with_capacity(AXIS_COUNT);
    for (axis, data) in samples.axes().iter().enumerate() {
        let estimate = welch_psd(data, sample_rate, config)
            .map_err(|e| e.with_context(format!("{} axis PSD", AXIS_NAMES[axis])))?;
        estimates.push(estimate);
    }

    let psd_total = &(&estimates[0].psd + &estimates[1].psd) + &estimates[2].psd;
    let mode_1_index = dominant_index(&psd_total).ok_or(AnalysisError::EmptyInput)?;

    let mut estimates = estimates.into_iter();
    let (Some(x), Some(y), Some(z)) = (estimates.next(), estimates.next(), estimates.next()) else {
        return Err(AnalysisError::EmptyInput);
    };
    let mode_1_freq = x.frequencies[mode_1_index];

    info!(
        "Mode 1: {:.2} Hz (bin {}, combined PSD {:.6e})",
        mode_1_freq,
        mode_1_index,
        psd_total[mode_1_index].abs()
    );

    Ok(AnalysisResult {
        frequencies: x.frequencies,
        psd_x: x.psd,
        psd_y: y.psd,
        psd_z: z.psd,
        psd_total,
        mode_1_freq,
        mode_1_index,
        sampling_rate: sample_rate,
        sample_count: samples.len(),
        nperseg: x.nperseg,
        segments: x.segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn tone(freq: f64, fs: f64, n: usize, amplitude: f64) -> Vec<f64> {
        (0..n)
            .map(|i| amplitude * (2.0 * PI * freq * i as f64 / fs).sin())
            .collect()
    }

    fn samples_with_tones(fs: f64, n: usize, freqs: [f64; 3]) -> AccelSamples {
        AccelSamples::new(
            tone(freqs[0], fs, n, 1.0),
            tone(freqs[1], fs, n, 0.5),
            tone(freqs[2], fs, n, 0.25),
            5,
        )
        .unwrap()
    }

    #[test]
    fn test_total_is_sum_of_axes() {
        let samples = samples_with_tones(5000.0, 6000, [120.0, 480.0, 900.0]);
        let result = compute_welch_psd(&samples, 5000.0, &WelchConfig::default()).unwrap();
        for i in 0..result.len() {
            assert_eq!(
                result.psd_total[i],
                result.psd_x[i] + result.psd_y[i] + result.psd_z[i]
            );
        }
    }

    #[test]
    fn test_all_arrays_share_length() {
        let samples = samples_with_tones(5000.0, 4096, [100.0, 200.0, 300.0]);
        let result = compute_welch_psd(&samples, 5000.0, &WelchConfig::default()).unwrap();
        let expected = 1024 / 2 + 1;
        for array in [
            &result.frequencies,
            &result.psd_x,
            &result.psd_y,
            &result.psd_z,
            &result.psd_total,
        ] {
            assert_eq!(array.len(), expected);
        }
        assert!(result.mode_1_index < expected);
    }

    #[test]
    fn test_dominant_mode_is_argmax_of_total() {
        let samples = samples_with_tones(5000.0, 8192, [250.0, 700.0, 1200.0]);
        let result = compute_welch_psd(&samples, 5000.0, &WelchConfig::default()).unwrap();
        let (max_idx, _) = result
            .psd_total
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |(bi, bv), (i, &v)| if v.abs() > bv { (i, v.abs()) } else { (bi, bv) });
        assert_eq!(result.mode_1_index, max_idx);
        assert_eq!(result.mode_1_freq, result.frequencies[max_idx]);
        assert!((result.mode_1_freq - 250.0).abs() <= result.frequency_resolution());
        assert_eq!(result.peak_psd(), result.psd_total[max_idx].abs());
    }

    #[test]
    fn test_repeat_runs_are_identical() {
        let samples = samples_with_tones(2000.0, 5000, [60.0, 75.0, 90.0]);
        let cfg = WelchConfig::default();
        let first = compute_welch_psd(&samples, 2000.0, &cfg).unwrap();
        let second = compute_welch_psd(&samples, 2000.0, &cfg).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_nan_input_propagates_to_first_bin() {
        let mut samples = samples_with_tones(1000.0, 2048, [50.0, 60.0, 70.0]);
        samples.x[10] = f64::NAN;
        let result = compute_welch_psd(&samples, 1000.0, &WelchConfig::default()).unwrap();
        assert_eq!(result.mode_1_index, 0);
        assert_eq!(result.mode_1_freq, 0.0);
        assert!(result.psd_total[0].is_nan());
        assert!(result.psd_y.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_dominant_index_rules() {
        use ndarray::array;
        assert_eq!(dominant_index(&array![1.0, -3.0, 3.0, 2.0]), Some(1));
        assert_eq!(dominant_index(&array![1.0, 5.0, f64::NAN, 9.0]), Some(2));
        assert_eq!(dominant_index(&Array1::<f64>::zeros(0)), None);
    }

    #[test]
    fn test_metadata_fields() {
        let samples = samples_with_tones(5000.0, 10000, [500.0, 500.0, 500.0]);
        let result = compute_welch_psd(&samples, 5000.0, &WelchConfig::default()).unwrap();
        assert_eq!(result.sample_count, 10000);
        assert!((result.duration_s() - 2.0).abs() < 1e-12);
        assert_eq!(result.nperseg, 1024);
        assert_eq!(result.segments, 10);
        assert_eq!(result.axis_psd(1), &result.psd_y);
        assert!((result.mode_1_freq - 500.0).abs() <= result.frequency_resolution());
    }
}
