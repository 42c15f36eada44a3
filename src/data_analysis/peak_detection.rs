// src/data_analysis/peak_detection.rs

use crate::constants::MIN_MODE_SEPARATION_BINS;
use crate::data_analysis::psd_analysis::AnalysisResult;

/// A local maximum of the combined PSD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mode {
    pub index: usize,
    pub frequency: f64,
    pub power: f64,
}

/// Returns up to `max_modes` modes of the combined PSD, strongest first.
///
/// The dominant mode always comes first. Secondary modes are local maxima
/// (leftmost point of a plateau) kept only if they sit more than
/// `MIN_MODE_SEPARATION_BINS` away from every stronger mode.
pub fn top_modes(result: &AnalysisResult, max_modes: usize) -> Vec<Mode> {
    let series = &result.psd_total;
    let mut modes: Vec<Mode> = Vec::new();
    if max_modes == 0 || series.is_empty() {
        return modes;
    }

    modes.push(Mode {
        index: result.mode_1_index,
        frequency: result.mode_1_freq,
        power: result.peak_psd(),
    });

    if series.len() > 2 {
        let mut candidates: Vec<Mode> = Vec::new();
        // Peak detection needs at least one point on each side.
        for j in 1..(series.len() - 1) {
            let amp = series[j].abs();
            let prev_amp = series[j - 1].abs();
            let next_amp = series[j + 1].abs();
            if amp > prev_amp && amp >= next_amp && j != result.mode_1_index {
                candidates.push(Mode {
                    index: j,
                    frequency: result.frequencies[j],
                    power: amp,
                });
            }
        }

        candidates.sort_by(|a, b| b.power.partial_cmp(&a.power).unwrap_or(std::cmp::Ordering::Equal));
        for candidate in candidates {
            if modes.len() >= max_modes {
                break;
            }
            let too_close = modes
                .iter()
                .any(|m| m.index.abs_diff(candidate.index) <= MIN_MODE_SEPARATION_BINS);
            if !too_close {
                modes.push(candidate);
            }
        }
    }

    modes
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    fn result_from_total(total: Array1<f64>) -> AnalysisResult {
        let n = total.len();
        let frequencies = Array1::from_iter((0..n).map(|i| i as f64 * 10.0));
        let (idx, _) = total
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |(bi, bv), (i, &v)| if v > bv { (i, v) } else { (bi, bv) });
        AnalysisResult {
            mode_1_freq: frequencies[idx],
            mode_1_index: idx,
            frequencies,
            psd_x: total.clone(),
            psd_y: Array1::zeros(n),
            psd_z: Array1::zeros(n),
            psd_total: total,
            sampling_rate: 20.0 * n as f64,
            sample_count: 2 * n,
            nperseg: 2 * (n - 1),
            segments: 1,
        }
    }

    #[test]
    fn test_dominant_mode_first() {
        let result = result_from_total(array![0.0, 1.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 3.0, 0.0]);
        let modes = top_modes(&result, 3);
        assert_eq!(modes.len(), 3);
        assert_eq!(modes[0].index, 4);
        assert_eq!(modes[1].index, 8);
        assert_eq!(modes[1].frequency, 80.0);
        assert_eq!(modes[2].index, 1);
    }

    #[test]
    fn test_close_peaks_are_suppressed() {
        let result = result_from_total(array![0.0, 4.0, 0.0, 5.0, 0.0, 0.0, 0.0, 2.0, 0.0]);
        let modes = top_modes(&result, 3);
        let indices: Vec<usize> = modes.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![3, 7]);
    }

    #[test]
    fn test_limit_respected() {
        let result = result_from_total(array![0.0, 2.0, 0.0, 0.0, 3.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(top_modes(&result, 1).len(), 1);
        assert!(top_modes(&result, 0).is_empty());
    }
}
