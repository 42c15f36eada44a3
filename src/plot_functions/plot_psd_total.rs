// src/plot_functions/plot_psd_total.rs

use std::path::{Path, PathBuf};

use crate::constants::{
    COLOR_MODE_MARKER, COLOR_PSD_TOTAL, LINE_WIDTH_MARKER, LINE_WIDTH_PLOT, PLOT_HEIGHT,
    PLOT_WIDTH, PLOT_X_START_HZ,
};
use crate::data_analysis::psd_analysis::AnalysisResult;
use crate::error::Result;
use crate::plot_framework::{draw_single_plot, psd_log_range, MarkerLine, PlotConfig, PlotSeries};

pub const PSD_Y_LABEL: &str = "PSD [V²/Hz]";
pub const FREQUENCY_X_LABEL: &str = "Frequency [Hz]";

/// Builds the combined PSD chart with the dominant mode marker.
pub fn total_psd_plot_config(result: &AnalysisResult, x_limit: f64) -> PlotConfig {
    let data: Vec<(f64, f64)> = result
        .frequencies
        .iter()
        .zip(result.psd_total.iter())
        .map(|(&f, &p)| (f, p.abs()))
        .collect();

    PlotConfig {
        title: "Power Spectral Density (Average)".to_string(),
        x_range: PLOT_X_START_HZ..x_limit,
        y_range: psd_log_range(visible_values(result, &result.psd_total, x_limit)),
        series: vec![PlotSeries {
            data,
            label: "PSD Total".to_string(),
            color: *COLOR_PSD_TOTAL,
            stroke_width: LINE_WIDTH_PLOT,
        }],
        markers: vec![MarkerLine {
            x: result.mode_1_freq,
            label: format!("Mode 1: {:.2} Hz", result.mode_1_freq),
            color: *COLOR_MODE_MARKER,
            stroke_width: LINE_WIDTH_MARKER,
        }],
        x_label: FREQUENCY_X_LABEL.to_string(),
        y_label: PSD_Y_LABEL.to_string(),
    }
}

/// PSD values whose frequency lies inside the displayed range.
pub(crate) fn visible_values<'a>(
    result: &'a AnalysisResult,
    psd: &'a ndarray::Array1<f64>,
    x_limit: f64,
) -> impl Iterator<Item = &'a f64> {
    result
        .frequencies
        .iter()
        .zip(psd.iter())
        .filter(move |(f, _)| **f <= x_limit)
        .map(|(_, p)| p)
}

/// Renders the combined PSD to `{root_name}_PSD_Average.png` in `output_dir`.
pub fn plot_total_psd(
    result: &AnalysisResult,
    x_limit: f64,
    root_name: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    let output_file = output_dir.join(format!("{}_PSD_Average.png", root_name));
    let plot_config = total_psd_plot_config(result, x_limit);
    draw_single_plot(&output_file, root_name, &plot_config, (PLOT_WIDTH, PLOT_HEIGHT))?;
    Ok(output_file)
}
