// src/main.rs

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use log::{debug, info, warn, LevelFilter};

use accel_psd_render::config::AppConfig;
use accel_psd_render::constants::MAX_MODES_TO_REPORT;
use accel_psd_render::data_analysis::peak_detection::top_modes;
use accel_psd_render::data_analysis::psd_analysis::{compute_welch_psd, AnalysisResult};
use accel_psd_render::data_analysis::spectral_analysis::WindowFunction;
use accel_psd_render::data_input::device::{hardware_available, SimulatedShaker};
use accel_psd_render::data_input::source::{DataSource, DeviceSource, FileSource};
use accel_psd_render::data_output::csv_export::{export_psd, export_summary};
use accel_psd_render::error::{AnalysisError, ErrorKind, Result, ResultExt};
use accel_psd_render::logger::init_logger;
use accel_psd_render::plot_functions::plot_axis_psd::plot_axis_psd;
use accel_psd_render::plot_functions::plot_psd_total::plot_total_psd;

const DEVICE_ROOT_NAME: &str = "acquisition";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    File,
    Device,
}

/// Welch PSD analysis and dominant vibration mode of 3-axis acceleration data.
#[derive(Debug, Parser)]
#[command(name = "accel_psd_render", version, about)]
struct Cli {
    /// Input CSV file, or `-` to read it from stdin.
    input: Option<String>,

    /// Where samples come from.
    #[arg(long, value_enum, default_value_t = SourceKind::File)]
    source: SourceKind,

    /// TOML file with `[analysis]` and `[acquisition]` tables. Flags override it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Sampling rate in Hz [default: 5000]
    #[arg(long = "fs", value_name = "HZ")]
    fs: Option<f64>,

    /// Welch segment length [default: 1024]
    #[arg(long)]
    nperseg: Option<usize>,

    /// Welch segment overlap [default: 50]
    #[arg(long)]
    noverlap: Option<usize>,

    /// Upper frequency shown on plots [default: 1000]
    #[arg(long = "xlimit", value_name = "HZ")]
    x_limit: Option<f64>,

    /// hann, hamming, blackman or rectangular
    #[arg(long)]
    window: Option<WindowFunction>,

    /// Explicit zero-based x,y,z column indices.
    #[arg(long, value_name = "X,Y,Z", value_parser = parse_columns)]
    columns: Option<[usize; 3]>,

    /// Directory for plots and exports [default: .]
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Skip PNG rendering.
    #[arg(long)]
    no_plots: bool,

    /// Acquisition length in seconds [default: 2.0]
    #[arg(long, value_name = "S")]
    duration: Option<f64>,

    /// Sine sweep start in Hz [default: 10]
    #[arg(long, value_name = "HZ")]
    sweep_start: Option<f64>,

    /// Sine sweep end in Hz [default: 1000]
    #[arg(long, value_name = "HZ")]
    sweep_end: Option<f64>,

    /// Channel specification [default: Dev1/ai0:2]
    #[arg(long)]
    channel: Option<String>,

    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }
}

fn parse_columns(value: &str) -> Result<[usize; 3]> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(AnalysisError::InvalidParameter(format!(
            "expected three comma separated indices, got '{}'",
            value
        )));
    }
    let mut columns = [0usize; 3];
    for (slot, part) in columns.iter_mut().zip(parts.iter()) {
        *slot = part.parse().map_err(|_| {
            AnalysisError::InvalidParameter(format!("invalid column index '{}'", part))
        })?;
    }
    Ok(columns)
}

/// Loads the optional TOML file, then applies flag overrides on top.
fn build_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let analysis = &mut config.analysis;
    if let Some(fs) = cli.fs {
        analysis.sampling_rate = fs;
    }
    if let Some(nperseg) = cli.nperseg {
        analysis.nperseg = nperseg;
    }
    if let Some(noverlap) = cli.noverlap {
        analysis.noverlap = noverlap;
    }
    if let Some(x_limit) = cli.x_limit {
        analysis.x_limit = x_limit;
    }
    if let Some(window) = cli.window {
        analysis.window = window;
    }
    if let Some(columns) = cli.columns {
        analysis.columns = Some(columns);
    }
    if let Some(dir) = &cli.output_dir {
        analysis.output_dir = dir.clone();
    }
    if cli.no_plots {
        analysis.render_plots = false;
    }

    let acquisition = &mut config.acquisition;
    if let Some(duration) = cli.duration {
        acquisition.duration_s = duration;
    }
    if let Some(start) = cli.sweep_start {
        acquisition.sweep_start_hz = start;
    }
    if let Some(end) = cli.sweep_end {
        acquisition.sweep_end_hz = end;
    }
    if let Some(channel) = &cli.channel {
        acquisition.channel = channel.clone();
    }

    config.analysis.validate()?;
    if cli.source == SourceKind::Device {
        config.acquisition.validate()?;
    }
    Ok(config)
}

fn select_source(cli: &Cli, config: &AppConfig) -> Result<(Box<dyn DataSource>, String)> {
    if cli.source == SourceKind::Device {
        if !hardware_available() {
            return Err(AnalysisError::DeviceUnavailable(
                "this build has no acquisition support (enable the 'simulated-daq' feature)"
                    .to_string(),
            ));
        }
        let request = config.acquisition.request(config.analysis.sampling_rate);
        let source = DeviceSource::new(SimulatedShaker::default(), request);
        return Ok((Box::new(source), DEVICE_ROOT_NAME.to_string()));
    }

    let input = cli.input.as_deref().ok_or_else(|| {
        AnalysisError::InvalidParameter("no input file given (use '-' for stdin)".to_string())
    })?;
    let source = FileSource::from_arg(input, config.analysis.column_layout());
    let root_name = source.root_name();
    Ok((Box::new(source), root_name))
}

fn mode_summary(result: &AnalysisResult) -> String {
    format!(
        "Mode 1 Frequency: {:.2} Hz (Index: {})",
        result.mode_1_freq, result.mode_1_index
    )
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;
    let analysis = &config.analysis;
    for warning in analysis.range_warnings() {
        warn!("{}", warning);
    }
    debug!("Effective configuration: {:?}", config);

    let (mut source, root_name) = select_source(cli, &config)?;
    info!("Loading data from {}", source.describe());
    let samples = source.load()?;

    if samples.source_columns > 0 {
        println!(
            "Loaded {} samples ({:.2} s at {} Hz) from {} columns.",
            samples.len(),
            samples.duration_s(analysis.sampling_rate),
            analysis.sampling_rate,
            samples.source_columns
        );
    } else {
        println!(
            "Acquired {} samples ({:.2} s at {} Hz).",
            samples.len(),
            samples.duration_s(analysis.sampling_rate),
            analysis.sampling_rate
        );
    }

    let result = compute_welch_psd(&samples, analysis.sampling_rate, &analysis.welch_config())?;
    println!("{}", mode_summary(&result));
    println!(
        "  resolution {:.2} Hz, {} segments of {} samples",
        result.frequency_resolution(),
        result.segments,
        result.nperseg
    );
    for (rank, mode) in top_modes(&result, MAX_MODES_TO_REPORT).iter().enumerate() {
        println!(
            "  #{}: {:.2} Hz (Index: {}), PSD {:.3e} V²/Hz",
            rank + 1,
            mode.frequency,
            mode.index,
            mode.power
        );
    }

    let output_dir = &analysis.output_dir;
    fs::create_dir_all(output_dir)
        .context(format!("Creating output directory {}", output_dir.display()))?;

    if analysis.render_plots {
        plot_total_psd(&result, analysis.x_limit, &root_name, output_dir)?;
        plot_axis_psd(&result, analysis.x_limit, &root_name, output_dir)?;
    } else {
        info!("Plot rendering disabled.");
    }

    export_psd(&result, &root_name, output_dir)?;
    export_summary(&result, &root_name, output_dir)?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.log_level());

    if let Err(e) = run(&cli) {
        match e.kind() {
            ErrorKind::Format => {
                eprintln!("Error: {}", e);
                process::exit(2);
            }
            ErrorKind::Unexpected => {
                eprintln!("An unexpected error occurred: {}", e);
                process::exit(1);
            }
        }
    }
}
