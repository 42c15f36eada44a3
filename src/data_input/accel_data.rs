// src/data_input/accel_data.rs

use crate::axis_names::AXIS_COUNT;
use crate::error::{AnalysisError, Result};

/// Three equal-length acceleration channels sampled at a fixed interval.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AccelSamples {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    /// Number of columns in the source table (0 for device acquisitions).
    pub source_columns: usize,
}

impl AccelSamples {
    /// Builds a sample set, rejecting channels of different length.
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>, source_columns: usize) -> Result<Self> {
        if x.len() != y.len() || x.len() != z.len() {
            return Err(AnalysisError::InvalidParameter(format!(
                "axis lengths differ: x={}, y={}, z={}",
                x.len(),
                y.len(),
                z.len()
            )));
        }
        Ok(Self {
            x,
            y,
            z,
            source_columns,
        })
    }

    /// Number of samples per axis.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Recording length in seconds at the given sampling rate.
    pub fn duration_s(&self, sampling_rate: f64) -> f64 {
        self.len() as f64 / sampling_rate
    }

    /// Channels in X, Y, Z order.
    pub fn axes(&self) -> [&[f64]; AXIS_COUNT] {
        [&self.x, &self.y, &self.z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_and_len() {
        let samples = AccelSamples::new(vec![0.0; 10000], vec![0.0; 10000], vec![0.0; 10000], 5).unwrap();
        assert_eq!(samples.len(), 10000);
        assert!((samples.duration_s(5000.0) - 2.0).abs() < 1e-12);
        assert_eq!(samples.axes()[2].len(), 10000);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let err = AccelSamples::new(vec![1.0, 2.0], vec![1.0], vec![1.0, 2.0], 0).unwrap_err();
        assert!(err.to_string().contains("y=1"));
    }
}
