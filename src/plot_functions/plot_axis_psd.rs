// src/plot_functions/plot_axis_psd.rs

use std::path::{Path, PathBuf};

use crate::axis_names::{AXIS_COUNT, AXIS_NAMES};
use crate::constants::{AXES_PLOT_HEIGHT, COLOR_PSD_AXIS, LINE_WIDTH_PLOT, PLOT_WIDTH, PLOT_X_START_HZ};
use crate::data_analysis::psd_analysis::AnalysisResult;
use crate::error::Result;
use crate::plot_framework::{draw_stacked_plot, psd_log_range, PlotConfig, PlotSeries};
use crate::plot_functions::plot_psd_total::{visible_values, FREQUENCY_X_LABEL, PSD_Y_LABEL};

/// Builds the PSD chart for one axis (0=X, 1=Y, 2=Z).
pub fn axis_psd_plot_config(result: &AnalysisResult, axis: usize, x_limit: f64) -> PlotConfig {
    let psd = result.axis_psd(axis);
    let data: Vec<(f64, f64)> = result
        .frequencies
        .iter()
        .zip(psd.iter())
        .map(|(&f, &p)| (f, p.abs()))
        .collect();

    PlotConfig {
        title: format!("{}-Axis PSD", AXIS_NAMES[axis]),
        x_range: PLOT_X_START_HZ..x_limit,
        y_range: psd_log_range(visible_values(result, psd, x_limit)),
        series: vec![PlotSeries {
            data,
            label: String::new(),
            color: *COLOR_PSD_AXIS[axis],
            stroke_width: LINE_WIDTH_PLOT,
        }],
        markers: Vec::new(),
        // Only the bottom chart carries the frequency label.
        x_label: if axis == AXIS_COUNT - 1 {
            FREQUENCY_X_LABEL.to_string()
        } else {
            String::new()
        },
        y_label: PSD_Y_LABEL.to_string(),
    }
}

/// Renders the X, Y and Z spectra stacked to `{root_name}_PSD_Axes.png` in `output_dir`.
pub fn plot_axis_psd(
    result: &AnalysisResult,
    x_limit: f64,
    root_name: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    let output_file = output_dir.join(format!("{}_PSD_Axes.png", root_name));
    draw_stacked_plot(
        &output_file,
        root_name,
        "Axis PSD",
        AXIS_COUNT,
        (PLOT_WIDTH, AXES_PLOT_HEIGHT),
        |axis| Some(axis_psd_plot_config(result, axis, x_limit)),
    )?;
    Ok(output_file)
}
