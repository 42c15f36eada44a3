// src/data_output/csv_export.rs

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;

use crate::constants::{PSD_EXPORT_FILE_NAME, SUMMARY_EXPORT_FILE_NAME};
use crate::data_analysis::psd_analysis::AnalysisResult;
use crate::error::{Result, ResultExt};

pub const PSD_HEADER: [&str; 5] = [
    "Frequency (Hz)",
    "PSD X (V²/Hz)",
    "PSD Y (V²/Hz)",
    "PSD Z (V²/Hz)",
    "PSD Total (V²/Hz)",
];

// Shortest round-trip text that always reads as a float, e.g. `0.0`, `2.5`, `1e-7`.
fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

/// Writes one row per frequency bin: frequency, the three axis spectra and the total.
pub fn write_psd_csv<W: Write>(result: &AnalysisResult, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(PSD_HEADER)?;
    for (i, freq) in result.frequencies.iter().enumerate() {
        wtr.write_record([
            format_float(*freq),
            format_float(result.psd_x[i]),
            format_float(result.psd_y[i]),
            format_float(result.psd_z[i]),
            format_float(result.psd_total[i]),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the `Parameter,Value` summary table.
pub fn write_summary_csv<W: Write>(result: &AnalysisResult, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Parameter", "Value"])?;
    let rows = [
        ("Mode 1 Frequency (Hz)", format!("{:.2}", result.mode_1_freq)),
        ("Sampling Rate (Hz)", result.sampling_rate.to_string()),
        ("Num Samples", result.sample_count.to_string()),
        ("Duration (s)", format!("{:.2}", result.duration_s())),
    ];
    for (parameter, value) in rows.iter() {
        wtr.write_record([*parameter, value.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

fn export_path(output_dir: &Path, root_name: &str, file_name: &str) -> PathBuf {
    output_dir.join(format!("{}_{}", root_name, file_name))
}

pub fn export_psd(result: &AnalysisResult, root_name: &str, output_dir: &Path) -> Result<PathBuf> {
    let path = export_path(output_dir, root_name, PSD_EXPORT_FILE_NAME);
    let file = File::create(&path).context(format!("creating '{}'", path.display()))?;
    write_psd_csv(result, file)?;
    info!("  PSD data exported to '{}'.", path.display());
    Ok(path)
}

pub fn export_summary(result: &AnalysisResult, root_name: &str, output_dir: &Path) -> Result<PathBuf> {
    let path = export_path(output_dir, root_name, SUMMARY_EXPORT_FILE_NAME);
    let file = File::create(&path).context(format!("creating '{}'", path.display()))?;
    write_summary_csv(result, file)?;
    info!("  Summary exported to '{}'.", path.display());
    Ok(path)
}
