// src/data_input/source.rs
//
// Where samples come from is decided once at the CLI boundary. The analysis
// only ever sees `AccelSamples`.

use std::io;
use std::path::PathBuf;

use crate::data_input::accel_data::AccelSamples;
use crate::data_input::csv_loader::{load_with_layout, ColumnLayout};
use crate::data_input::device::{AcquisitionDevice, AcquisitionRequest};
use crate::data_input::upload::load_uploaded;
use crate::error::{AnalysisError, Result, ResultExt};

/// A producer of three-axis acceleration samples.
pub trait DataSource {
    /// Short description for logs and reports.
    fn describe(&self) -> String;

    fn load(&mut self) -> Result<AccelSamples>;
}

/// Input for a file-backed source.
#[derive(Debug, Clone, PartialEq)]
pub enum FileInput {
    Path(PathBuf),
    /// CSV content streamed on stdin, staged through a temporary file.
    Stdin,
}

#[derive(Debug, Clone)]
pub struct FileSource {
    pub input: FileInput,
    pub layout: ColumnLayout,
}

impl FileSource {
    /// `-` selects stdin, anything else is a path.
    pub fn from_arg(arg: &str, layout: ColumnLayout) -> Self {
        let input = if arg == "-" {
            FileInput::Stdin
        } else {
            FileInput::Path(PathBuf::from(arg))
        };
        Self { input, layout }
    }

    /// File stem used to name plots and exports.
    pub fn root_name(&self) -> String {
        match &self.input {
            FileInput::Path(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string()),
            FileInput::Stdin => "upload".to_string(),
        }
    }
}

impl DataSource for FileSource {
    fn describe(&self) -> String {
        match &self.input {
            FileInput::Path(path) => format!("CSV file {}", path.display()),
            FileInput::Stdin => "CSV upload (stdin)".to_string(),
        }
    }

    fn load(&mut self) -> Result<AccelSamples> {
        match &self.input {
            FileInput::Path(path) => load_with_layout(path, self.layout),
            FileInput::Stdin => {
                load_uploaded(io::stdin().lock(), self.layout).context("Loading upload")
            }
        }
    }
}

/// Acquires samples from a device for a fixed duration.
pub struct DeviceSource<D: AcquisitionDevice> {
    pub device: D,
    pub request: AcquisitionRequest,
}

impl<D: AcquisitionDevice> DeviceSource<D> {
    pub fn new(device: D, request: AcquisitionRequest) -> Self {
        Self { device, request }
    }
}

impl<D: AcquisitionDevice> DataSource for DeviceSource<D> {
    fn describe(&self) -> String {
        format!("{} ({})", self.device.name(), self.request.channel)
    }

    fn load(&mut self) -> Result<AccelSamples> {
        if !self.device.is_available() {
            return Err(AnalysisError::DeviceUnavailable(
                self.device.name().to_string(),
            ));
        }
        let samples = self.device.acquire(&self.request)?;
        if samples.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_input::device::SimulatedShaker;
    use std::io::Write;

    struct OfflineDevice;

    impl AcquisitionDevice for OfflineDevice {
        fn name(&self) -> &str {
            "Offline DAQ"
        }

        fn is_available(&self) -> bool {
            false
        }

        fn acquire(&mut self, _request: &AcquisitionRequest) -> Result<AccelSamples> {
            panic!("acquire must not be called on an unavailable device");
        }
    }

    fn request() -> AcquisitionRequest {
        AcquisitionRequest {
            duration_s: 0.2,
            sampling_rate: 1000.0,
            sweep_start_hz: 10.0,
            sweep_end_hz: 200.0,
            channel: "Dev1/ai0:2".to_string(),
        }
    }

    #[test]
    fn test_file_source_root_name() {
        let source = FileSource::from_arg("/tmp/run_42.csv", ColumnLayout::Inferred);
        assert_eq!(source.root_name(), "run_42");
        let stdin = FileSource::from_arg("-", ColumnLayout::Inferred);
        assert_eq!(stdin.input, FileInput::Stdin);
        assert_eq!(stdin.root_name(), "upload");
    }

    #[test]
    fn test_file_source_loads_path() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "t,ax,ay,az").unwrap();
        writeln!(file, "0,1,2,3").unwrap();
        file.flush().unwrap();

        let mut source = FileSource {
            input: FileInput::Path(file.path().to_path_buf()),
            layout: ColumnLayout::Inferred,
        };
        let samples = source.load().unwrap();
        assert_eq!(samples.x, vec![1.0]);
        assert!(source.describe().starts_with("CSV file"));
    }

    #[test]
    fn test_device_source_uses_device() {
        let mut source = DeviceSource::new(SimulatedShaker::default(), request());
        let samples = source.load().unwrap();
        assert_eq!(samples.len(), 200);
        assert_eq!(source.describe(), "Simulated shaker (Dev1/ai0:2)");
    }

    #[test]
    fn test_unavailable_device_is_rejected() {
        let mut source = DeviceSource::new(OfflineDevice, request());
        assert!(matches!(
            source.load(),
            Err(AnalysisError::DeviceUnavailable(_))
        ));
    }
}
