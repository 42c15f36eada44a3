// src/constants.rs

use plotters::style::colors::full_palette::{BLUE, GREEN, ORANGE, PURPLE, RED};
use plotters::style::RGBColor;

// Analysis defaults.
pub const DEFAULT_SAMPLING_RATE_HZ: f64 = 5000.0;
pub const DEFAULT_NPERSEG: usize = 1024;
pub const DEFAULT_NOVERLAP: usize = 50;
pub const DEFAULT_X_LIMIT_HZ: f64 = 1000.0;

// Recommended parameter bounds. Values outside are accepted with a warning.
pub const SAMPLING_RATE_RANGE_HZ: (f64, f64) = (100.0, 100_000.0);
pub const NPERSEG_RANGE: (usize, usize) = (256, 4096);
pub const NPERSEG_STEP: usize = 256;
pub const NOVERLAP_MAX: usize = 200;
pub const X_LIMIT_RANGE_HZ: (f64, f64) = (10.0, 10_000.0);

// Acquisition defaults.
pub const DEFAULT_ACQ_DURATION_S: f64 = 2.0;
pub const DEFAULT_SWEEP_START_HZ: f64 = 10.0;
pub const DEFAULT_SWEEP_END_HZ: f64 = 1000.0;
pub const DEFAULT_CHANNEL: &str = "Dev1/ai0:2";

// Simulated shaker: single degree of freedom per axis.
pub const SHAKER_NATURAL_FREQ_HZ: [f64; 3] = [180.0, 240.0, 310.0];
pub const SHAKER_DAMPING_RATIO: f64 = 0.05;
pub const SHAKER_EXCITATION_AMPLITUDE: f64 = 1.0;

// Number of secondary modes reported on the console.
pub const MAX_MODES_TO_REPORT: usize = 3;
// Secondary modes must be separated from stronger ones by more than this many bins.
pub const MIN_MODE_SEPARATION_BINS: usize = 2;

// Plot dimensions.
pub const PLOT_WIDTH: u32 = 1600;
pub const PLOT_HEIGHT: u32 = 960;
pub const AXES_PLOT_HEIGHT: u32 = 1600;

// Left edge of the frequency axis, matches the dashboard view.
pub const PLOT_X_START_HZ: f64 = -0.5;
// Lower bound for the log-scaled PSD axis when the data contains zeros.
pub const PSD_LOG_FLOOR: f64 = 1e-12;
// Multiplicative headroom above the largest PSD value.
pub const PSD_Y_AXIS_HEADROOM_FACTOR: f64 = 2.0;

// Font sizes.
pub const FONT_SIZE_MAIN_TITLE: i32 = 24;
pub const FONT_SIZE_CHART_TITLE: i32 = 20;
pub const FONT_SIZE_AXIS_LABEL: i32 = 14;
pub const FONT_SIZE_LEGEND: i32 = 14;
pub const FONT_SIZE_MESSAGE: i32 = 18;

// --- Plot Color Assignments ---
pub const COLOR_PSD_TOTAL: &RGBColor = &BLUE;
pub const COLOR_MODE_MARKER: &RGBColor = &RED;
pub const COLOR_PSD_AXIS: [&RGBColor; 3] = [&ORANGE, &GREEN, &PURPLE];

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 1;
pub const LINE_WIDTH_MARKER: u32 = 2;
pub const LINE_WIDTH_LEGEND: u32 = 2;
// Number of dashes used to draw the dominant mode marker.
pub const MARKER_DASH_SEGMENTS: usize = 30;

// Export file names.
pub const PSD_EXPORT_FILE_NAME: &str = "psd_results.csv";
pub const SUMMARY_EXPORT_FILE_NAME: &str = "analysis_summary.csv";

// src/constants.rs
