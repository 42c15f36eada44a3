// src/config.rs
//
// User-adjustable parameters. Loaded from an optional TOML file and then
// overridden by command line flags.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_ACQ_DURATION_S, DEFAULT_CHANNEL, DEFAULT_NOVERLAP, DEFAULT_NPERSEG,
    DEFAULT_SAMPLING_RATE_HZ, DEFAULT_SWEEP_END_HZ, DEFAULT_SWEEP_START_HZ, DEFAULT_X_LIMIT_HZ,
    NOVERLAP_MAX, NPERSEG_RANGE, NPERSEG_STEP, SAMPLING_RATE_RANGE_HZ, X_LIMIT_RANGE_HZ,
};
use crate::data_analysis::spectral_analysis::{WelchConfig, WindowFunction};
use crate::data_input::csv_loader::ColumnLayout;
use crate::data_input::device::AcquisitionRequest;
use crate::error::{AnalysisError, Result, ResultExt};

/// Parameters for the spectral analysis and the rendered views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Sampling rate in Hz.
    pub sampling_rate: f64,
    /// Welch segment length in samples.
    pub nperseg: usize,
    /// Overlap between adjacent Welch segments in samples.
    pub noverlap: usize,
    /// Upper frequency shown on plots, in Hz.
    pub x_limit: f64,
    pub window: WindowFunction,
    /// Explicit x, y, z column indices. `None` infers them from the column count.
    pub columns: Option<[usize; 3]>,
    pub output_dir: PathBuf,
    pub render_plots: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sampling_rate: DEFAULT_SAMPLING_RATE_HZ,
            nperseg: DEFAULT_NPERSEG,
            noverlap: DEFAULT_NOVERLAP,
            x_limit: DEFAULT_X_LIMIT_HZ,
            window: WindowFunction::default(),
            columns: None,
            output_dir: PathBuf::from("."),
            render_plots: true,
        }
    }
}

impl AnalysisConfig {
    /// Rejects parameters the estimator cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.sampling_rate.is_finite() && self.sampling_rate > 0.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "sampling rate must be positive, got {}",
                self.sampling_rate
            )));
        }
        if self.nperseg < 2 {
            return Err(AnalysisError::InvalidParameter(format!(
                "segment length must be at least 2, got {}",
                self.nperseg
            )));
        }
        if self.noverlap >= self.nperseg {
            return Err(AnalysisError::InvalidParameter(format!(
                "overlap ({}) must be smaller than segment length ({})",
                self.noverlap, self.nperseg
            )));
        }
        if !(self.x_limit.is_finite() && self.x_limit > 0.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "frequency display limit must be positive, got {}",
                self.x_limit
            )));
        }
        Ok(())
    }

    /// Lists parameters that fall outside the recommended ranges.
    pub fn range_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let (fs_min, fs_max) = SAMPLING_RATE_RANGE_HZ;
        if self.sampling_rate < fs_min || self.sampling_rate > fs_max {
            warnings.push(format!(
                "Sampling rate {} Hz is outside the recommended range {}..={} Hz",
                self.sampling_rate, fs_min, fs_max
            ));
        }
        let (seg_min, seg_max) = NPERSEG_RANGE;
        if self.nperseg < seg_min || self.nperseg > seg_max || self.nperseg % NPERSEG_STEP != 0 {
            warnings.push(format!(
                "Segment length {} is outside the recommended values ({}..={} in steps of {})",
                self.nperseg, seg_min, seg_max, NPERSEG_STEP
            ));
        }
        if self.noverlap > NOVERLAP_MAX {
            warnings.push(format!(
                "Overlap {} exceeds the recommended maximum of {} points",
                self.noverlap, NOVERLAP_MAX
            ));
        }
        let (x_min, x_max) = X_LIMIT_RANGE_HZ;
        if self.x_limit < x_min || self.x_limit > x_max {
            warnings.push(format!(
                "Frequency limit {} Hz is outside the recommended range {}..={} Hz",
                self.x_limit, x_min, x_max
            ));
        }
        warnings
    }

    pub fn welch_config(&self) -> WelchConfig {
        WelchConfig {
            nperseg: self.nperseg,
            noverlap: self.noverlap,
            window: self.window,
        }
    }

    pub fn column_layout(&self) -> ColumnLayout {
        match self.columns {
            Some([x, y, z]) => ColumnLayout::Explicit { x, y, z },
            None => ColumnLayout::Inferred,
        }
    }
}

/// Parameters for the device-backed data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    pub duration_s: f64,
    pub sweep_start_hz: f64,
    pub sweep_end_hz: f64,
    pub channel: String,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            duration_s: DEFAULT_ACQ_DURATION_S,
            sweep_start_hz: DEFAULT_SWEEP_START_HZ,
            sweep_end_hz: DEFAULT_SWEEP_END_HZ,
            channel: DEFAULT_CHANNEL.to_string(),
        }
    }
}

impl AcquisitionConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.duration_s.is_finite() && self.duration_s > 0.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "acquisition duration must be positive, got {}",
                self.duration_s
            )));
        }
        if !(self.sweep_start_hz >= 0.0 && self.sweep_start_hz < self.sweep_end_hz) {
            return Err(AnalysisError::InvalidParameter(format!(
                "sweep start ({} Hz) must be below sweep end ({} Hz)",
                self.sweep_start_hz, self.sweep_end_hz
            )));
        }
        if self.channel.trim().is_empty() {
            return Err(AnalysisError::InvalidParameter(
                "channel name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request(&self, sampling_rate: f64) -> AcquisitionRequest {
        AcquisitionRequest {
            duration_s: self.duration_s,
            sampling_rate,
            sweep_start_hz: self.sweep_start_hz,
            sweep_end_hz: self.sweep_end_hz,
            channel: self.channel.clone(),
        }
    }
}

/// Top level configuration file layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub acquisition: AcquisitionConfig,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context(format!("Reading {}", path.display()))?;
        Self::from_toml_str(&content).context(format!("Parsing {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.sampling_rate, 5000.0);
        assert_eq!(cfg.nperseg, 1024);
        assert_eq!(cfg.noverlap, 50);
        assert_eq!(cfg.x_limit, 1000.0);
        assert!(cfg.validate().is_ok());
        assert!(cfg.range_warnings().is_empty());
        assert_eq!(cfg.column_layout(), ColumnLayout::Inferred);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [analysis]
            sampling_rate = 2000.0
            columns = [1, 2, 3]

            [acquisition]
            channel = "Dev2/ai0:2"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.analysis.sampling_rate, 2000.0);
        assert_eq!(cfg.analysis.nperseg, 1024);
        assert_eq!(
            cfg.analysis.column_layout(),
            ColumnLayout::Explicit { x: 1, y: 2, z: 3 }
        );
        assert_eq!(cfg.acquisition.channel, "Dev2/ai0:2");
        assert_eq!(cfg.acquisition.duration_s, 2.0);
    }

    #[test]
    fn test_window_parsed_from_toml() {
        let cfg = AppConfig::from_toml_str("[analysis]\nwindow = \"hamming\"\n").unwrap();
        assert_eq!(cfg.analysis.window, WindowFunction::Hamming);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[analysis]\nnperseg = \"big\"\n").unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_validation_rejects_overlap_not_below_segment() {
        let cfg = AnalysisConfig {
            nperseg: 256,
            noverlap: 256,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_validation_rejects_non_positive_rate() {
        let cfg = AnalysisConfig {
            sampling_rate: 0.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_out_of_range_values_only_warn() {
        let cfg = AnalysisConfig {
            nperseg: 1000,
            noverlap: 300,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.range_warnings().len(), 2);
    }

    #[test]
    fn test_acquisition_validation() {
        assert!(AcquisitionConfig::default().validate().is_ok());
        let reversed = AcquisitionConfig {
            sweep_start_hz: 500.0,
            sweep_end_hz: 100.0,
            ..Default::default()
        };
        assert!(reversed.validate().is_err());
        let request = AcquisitionConfig::default().request(5000.0);
        assert_eq!(request.sampling_rate, 5000.0);
        assert_eq!(request.channel, "Dev1/ai0:2");
    }
}
