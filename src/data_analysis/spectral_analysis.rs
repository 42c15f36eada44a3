// src/data_analysis/spectral_analysis.rs

use log::{debug, warn};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_NOVERLAP, DEFAULT_NPERSEG};
use crate::data_analysis::fft_utils;
use crate::error::{AnalysisError, Result};

/// Taper applied to each Welch segment before the FFT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowFunction {
    #[default]
    Hann,
    Hamming,
    Blackman,
    /// No tapering.
    Rectangular,
}

impl WindowFunction {
    pub fn display_name(&self) -> &'static str {
        match self {
            WindowFunction::Hann => "Hann",
            WindowFunction::Hamming => "Hamming",
            WindowFunction::Blackman => "Blackman",
            WindowFunction::Rectangular => "Rectangular",
        }
    }

    /// Periodic window of `n` samples, suitable for spectral analysis.
    pub fn generate(&self, n: usize) -> Array1<f64> {
        if n <= 1 {
            return Array1::ones(n);
        }
        let n_f = n as f64;
        Array1::from_iter((0..n).map(|i| {
            let x = 2.0 * PI * i as f64 / n_f;
            match self {
                WindowFunction::Hann => 0.5 - 0.5 * x.cos(),
                WindowFunction::Hamming => 0.54 - 0.46 * x.cos(),
                // Clamp: the endpoint is exactly 0 but rounds to -epsilon.
                WindowFunction::Blackman => (0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos()).max(0.0),
                WindowFunction::Rectangular => 1.0,
            }
        }))
    }
}

impl fmt::Display for WindowFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for WindowFunction {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hann" | "hanning" => Ok(WindowFunction::Hann),
            "hamming" => Ok(WindowFunction::Hamming),
            "blackman" => Ok(WindowFunction::Blackman),
            "rectangular" | "boxcar" | "none" => Ok(WindowFunction::Rectangular),
            other => Err(AnalysisError::InvalidParameter(format!(
                "unknown window function '{}'",
                other
            ))),
        }
    }
}

/// Configuration for Welch's method spectral analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WelchConfig {
    /// Segment length in samples. Also the FFT length.
    pub nperseg: usize,
    /// Samples shared by adjacent segments.
    pub noverlap: usize,
    pub window: WindowFunction,
}

impl Default for WelchConfig {
    fn default() -> Self {
        Self {
            nperseg: DEFAULT_NPERSEG,
            noverlap: DEFAULT_NOVERLAP,
            window: WindowFunction::Hann,
        }
    }
}

/// One-sided power spectral density estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct WelchEstimate {
    pub frequencies: Array1<f64>,
    pub psd: Array1<f64>,
    /// Segment length actually used (clamped to the signal length).
    pub nperseg: usize,
    pub noverlap: usize,
    pub segments: usize,
}

/// Resolves the segment length and overlap for a signal of `signal_len` samples.
///
/// A segment longer than the signal is shortened to the signal length. The
/// overlap must still be smaller than the shortened segment.
fn effective_segmentation(signal_len: usize, config: &WelchConfig) -> Result<(usize, usize)> {
    if config.nperseg == 0 {
        return Err(AnalysisError::InvalidParameter(
            "segment length must be positive".to_string(),
        ));
    }
    if config.noverlap >= config.nperseg {
        return Err(AnalysisError::InvalidParameter(format!(
            "overlap ({}) must be smaller than segment length ({})",
            config.noverlap, config.nperseg
        )));
    }

    let mut nperseg = config.nperseg;
    if nperseg > signal_len {
        warn!(
            "Segment length {} is greater than signal length {}, using {}",
            nperseg, signal_len, signal_len
        );
        nperseg = signal_len;
        if config.noverlap >= nperseg {
            return Err(AnalysisError::InvalidParameter(format!(
                "overlap ({}) must be smaller than segment length ({}) for a {}-sample signal",
                config.noverlap, nperseg, signal_len
            )));
        }
    }
    Ok((nperseg, config.noverlap))
}

/// Computes Power Spectral Density using Welch's method
///
/// Splits the signal into segments of `nperseg` samples that overlap by
/// `noverlap`, removes each segment's mean, applies the window and averages
/// the one-sided periodograms. Density scaling: `|X|^2 / (fs * sum(w^2))`,
/// doubled for every bin except DC and, for even lengths, Nyquist.
pub fn welch_psd(signal: &[f64], sample_rate: f64, config: &WelchConfig) -> Result<WelchEstimate> {
    if signal.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(AnalysisError::InvalidParameter(format!(
            "sampling rate must be positive, got {}",
            sample_rate
        )));
    }

    let (nperseg, noverlap) = effective_segmentation(signal.len(), config)?;
    let step = nperseg - noverlap;
    let num_segments = (signal.len() - noverlap) / step;

    let window = config.window.generate(nperseg);
    let window_power: f64 = window.iter().map(|w| w * w).sum();
    let scale = 1.0 / (sample_rate * window_power);

    let num_freqs = fft_utils::rfft_len(nperseg);
    let plan = fft_utils::plan_forward(nperseg);
    let mut psd_sum = Array1::<f64>::zeros(num_freqs);
    let mut segment = vec![0.0f64; nperseg];

    for seg_idx in 0..num_segments {
        let start = seg_idx * step;
        let slice = &signal[start..start + nperseg];
        let mean = slice.iter().sum::<f64>() / nperseg as f64;
        for ((dst, &src), &w) in segment.iter_mut().zip(slice).zip(window.iter()) {
            *dst = (src - mean) * w;
        }

        let spectrum = fft_utils::fft_forward_with(&plan, &mut segment)?;
        for (acc, bin) in psd_sum.iter_mut().zip(spectrum.iter()) {
            *acc += bin.norm_sqr();
        }
    }

    let mut psd = psd_sum.mapv(|p| p * scale / num_segments as f64);
    // One-sided spectrum: double power for positive frequencies (except DC and Nyquist)
    let last_doubled = if nperseg % 2 == 0 { num_freqs - 1 } else { num_freqs };
    for value in psd.iter_mut().take(last_doubled).skip(1) {
        *value *= 2.0;
    }

    debug!(
        "Welch: {} samples, nperseg={}, noverlap={}, {} segments",
        signal.len(),
        nperseg,
        noverlap,
        num_segments
    );

    Ok(WelchEstimate {
        frequencies: fft_utils::rfft_frequencies(nperseg, sample_rate),
        psd,
        nperseg,
        noverlap,
        segments: num_segments,
    })
}
