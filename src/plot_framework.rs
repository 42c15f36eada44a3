// src/plot_framework.rs

use log::info;
use ndarray::Array1;
use ndarray_stats::QuantileExt;
use plotters::backend::BitMapBackend;
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::coord::combinators::IntoLogRange;
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{PathElement, Text};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, RED, WHITE};
use plotters::style::{Color, IntoFont, RGBColor};

use std::error::Error;
use std::ops::Range;
use std::path::Path;

use crate::constants::{
    FONT_SIZE_AXIS_LABEL, FONT_SIZE_CHART_TITLE, FONT_SIZE_LEGEND, FONT_SIZE_MAIN_TITLE,
    FONT_SIZE_MESSAGE, LINE_WIDTH_LEGEND, MARKER_DASH_SEGMENTS, PSD_LOG_FLOOR,
    PSD_Y_AXIS_HEADROOM_FACTOR,
};
use crate::error::{AnalysisError, Result};

type PlotResult = std::result::Result<(), Box<dyn Error>>;

#[derive(Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
}

/// Dashed vertical line spanning the full Y range, e.g. the dominant mode.
#[derive(Clone)]
pub struct MarkerLine {
    pub x: f64,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
}

/// A single semi-log chart: linear X (frequency), logarithmic Y (power).
#[derive(Clone)]
pub struct PlotConfig {
    pub title: String,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub series: Vec<PlotSeries>,
    pub markers: Vec<MarkerLine>,
    pub x_label: String,
    pub y_label: String,
}

/// Log-axis range covering the positive values in `values`, with headroom above the maximum.
pub fn psd_log_range<'a, I>(values: I) -> Range<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    let positive: Array1<f64> = values
        .into_iter()
        .map(|v| v.abs())
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();
    if positive.is_empty() {
        return PSD_LOG_FLOOR..1.0;
    }
    let (min, max) = (*positive.min_skipnan(), *positive.max_skipnan());
    let lower = (min / PSD_Y_AXIS_HEADROOM_FACTOR).max(PSD_LOG_FLOOR);
    let upper = (max * PSD_Y_AXIS_HEADROOM_FACTOR).max(lower * 10.0);
    lower..upper
}

/// Draw a "Data Unavailable" message on a plot area.
pub fn draw_unavailable_message(
    area: &DrawingArea<BitMapBackend, Shift>,
    plot_type: &str,
    reason: &str,
) -> PlotResult {
    let (x_range, y_range) = area.get_pixel_range();
    let (width, height) = (x_range.end - x_range.start, y_range.end - y_range.start);
    let message = format!("{plot_type} Data Unavailable: {reason}");
    // Rough centering: characters are about 0.6 of the font size wide.
    let text_width = (message.len() as f32 * FONT_SIZE_MESSAGE as f32 * 0.6) as i32;
    let position = (width / 2 - text_width / 2, height / 2 - FONT_SIZE_MESSAGE / 2);
    let text_style = ("sans-serif", FONT_SIZE_MESSAGE).into_font().color(&RED);
    area.draw(&Text::new(message, position, text_style))?;
    Ok(())
}

/// Draws one semi-log chart from a `PlotConfig`.
fn draw_single_chart(area: &DrawingArea<BitMapBackend, Shift>, plot_config: &PlotConfig) -> PlotResult {
    let y_start = plot_config.y_range.start;
    let y_end = plot_config.y_range.end;

    let mut chart = ChartBuilder::on(area)
        .caption(&plot_config.title, ("sans-serif", FONT_SIZE_CHART_TITLE))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(plot_config.x_range.clone(), (y_start..y_end).log_scale())?;

    chart
        .configure_mesh()
        .x_desc(&plot_config.x_label)
        .y_desc(&plot_config.y_label)
        .x_labels(20)
        .y_labels(10)
        .y_label_formatter(&|y| format!("{:.0e}", y))
        .light_line_style(WHITE.mix(0.7))
        .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
        .draw()?;

    let mut legend_series_count = 0;
    let x_range = &plot_config.x_range;

    for s in &plot_config.series {
        let points: Vec<(f64, f64)> = s
            .data
            .iter()
            .filter(|(x, _)| x_range.contains(x))
            .map(|&(x, y)| (x, y.abs().clamp(y_start, y_end)))
            .collect();
        if points.is_empty() {
            continue;
        }
        let color = s.color;
        let series = chart.draw_series(LineSeries::new(points, color.stroke_width(s.stroke_width)))?;
        if !s.label.is_empty() {
            series.label(&s.label).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH_LEGEND))
            });
            legend_series_count += 1;
        }
    }

    // Dashes are evenly spaced in log space so they look uniform on the log axis.
    let log_start = y_start.log10();
    let dash_len = (y_end.log10() - log_start) / (MARKER_DASH_SEGMENTS as f64 * 2.0);
    for marker in &plot_config.markers {
        if !marker.x.is_finite() {
            continue;
        }
        let x = marker.x.clamp(x_range.start, x_range.end);
        let color = marker.color;
        for i in 0..MARKER_DASH_SEGMENTS {
            let lo = 10f64.powf(log_start + (2 * i) as f64 * dash_len);
            let hi = 10f64.powf(log_start + (2 * i + 1) as f64 * dash_len);
            let dash = chart.draw_series(LineSeries::new(
                vec![(x, lo), (x, hi.min(y_end))],
                color.stroke_width(marker.stroke_width),
            ))?;
            if i == 0 && !marker.label.is_empty() {
                dash.label(&marker.label).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH_LEGEND))
                });
                legend_series_count += 1;
            }
        }
    }

    if legend_series_count > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", FONT_SIZE_LEGEND))
            .draw()?;
    }

    Ok(())
}

fn has_drawable_data(plot_config: &PlotConfig) -> bool {
    let valid_ranges = plot_config.x_range.end > plot_config.x_range.start
        && plot_config.y_range.end > plot_config.y_range.start
        && plot_config.y_range.start > 0.0;
    valid_ranges && plot_config.series.iter().any(|s| !s.data.is_empty())
}

fn render_single(output_path: &Path, root_name: &str, plot_config: &PlotConfig, size: (u32, u32)) -> PlotResult {
    let root_area = BitMapBackend::new(output_path, size).into_drawing_area();
    root_area.fill(&WHITE)?;
    root_area.draw(&Text::new(
        root_name,
        (10, 10),
        ("sans-serif", FONT_SIZE_MAIN_TITLE).into_font().color(&BLACK),
    ))?;
    let area = root_area.margin(40, 5, 5, 5);
    if has_drawable_data(plot_config) {
        draw_single_chart(&area, plot_config)?;
    } else {
        draw_unavailable_message(&area, &plot_config.title, "No data points")?;
    }
    root_area.present()?;
    Ok(())
}

/// Renders one chart into a PNG file.
pub fn draw_single_plot(
    output_path: &Path,
    root_name: &str,
    plot_config: &PlotConfig,
    size: (u32, u32),
) -> Result<()> {
    render_single(output_path, root_name, plot_config, size).map_err(AnalysisError::plot)?;
    info!("  Plot saved as '{}'.", output_path.display());
    Ok(())
}

fn render_stacked<F>(
    output_path: &Path,
    root_name: &str,
    plot_type_name: &str,
    rows: usize,
    size: (u32, u32),
    mut get_row_plot: F,
) -> std::result::Result<bool, Box<dyn Error>>
where
    F: FnMut(usize) -> Option<PlotConfig>,
{
    let root_area = BitMapBackend::new(output_path, size).into_drawing_area();
    root_area.fill(&WHITE)?;
    root_area.draw(&Text::new(
        root_name,
        (10, 10),
        ("sans-serif", FONT_SIZE_MAIN_TITLE).into_font().color(&BLACK),
    ))?;
    let margined_root_area = root_area.margin(40, 5, 5, 5);
    let sub_plot_areas = margined_root_area.split_evenly((rows, 1));
    let mut any_row_plotted = false;

    for (row, area) in sub_plot_areas.iter().enumerate() {
        match get_row_plot(row) {
            Some(plot_config) if has_drawable_data(&plot_config) => {
                draw_single_chart(area, &plot_config)?;
                any_row_plotted = true;
            }
            Some(plot_config) => {
                draw_unavailable_message(area, &plot_config.title, "No data points")?;
            }
            None => {
                draw_unavailable_message(area, plot_type_name, "Calculation Failed")?;
            }
        }
    }

    root_area.present()?;
    Ok(any_row_plotted)
}

/// Creates a stacked plot image with one chart per row.
pub fn draw_stacked_plot<F>(
    output_path: &Path,
    root_name: &str,
    plot_type_name: &str,
    rows: usize,
    size: (u32, u32),
    get_row_plot: F,
) -> Result<()>
where
    F: FnMut(usize) -> Option<PlotConfig>,
{
    let any_row_plotted = render_stacked(output_path, root_name, plot_type_name, rows, size, get_row_plot)
        .map_err(AnalysisError::plot)?;
    if any_row_plotted {
        info!("  Stacked plot saved as '{}'.", output_path.display());
    } else {
        info!(
            "  '{}' saved with placeholder messages only: no data available to plot.",
            output_path.display()
        );
    }
    Ok(())
}
