// src/data_input/device.rs
//
// Device-backed acquisition. A device streams the three acceleration channels
// for a fixed duration while a sine sweep drives the structure.

use log::info;
use std::f64::consts::PI;

use crate::axis_names::AXIS_COUNT;
use crate::constants::{
    SHAKER_DAMPING_RATIO, SHAKER_EXCITATION_AMPLITUDE, SHAKER_NATURAL_FREQ_HZ,
};
use crate::data_input::accel_data::AccelSamples;
use crate::error::{AnalysisError, Result};

// Relative response of each axis to the sweep; X carries most of the energy.
const SHAKER_AXIS_GAIN: [f64; AXIS_COUNT] = [1.0, 0.6, 0.4];

/// Parameters of a single acquisition run.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionRequest {
    pub duration_s: f64,
    pub sampling_rate: f64,
    pub sweep_start_hz: f64,
    pub sweep_end_hz: f64,
    /// Channel specification, e.g. `Dev1/ai0:2` or `Dev1/ai0,Dev1/ai1,Dev1/ai2`.
    pub channel: String,
}

impl AcquisitionRequest {
    /// Number of samples per channel the request produces.
    pub fn sample_count(&self) -> usize {
        (self.duration_s * self.sampling_rate).round() as usize
    }
}

/// A data acquisition device that returns three equal-length channels.
pub trait AcquisitionDevice {
    /// Name shown in logs.
    fn name(&self) -> &str;

    /// Whether the device can be used in this environment.
    fn is_available(&self) -> bool;

    /// Blocks for the acquisition and returns the X, Y, Z samples.
    fn acquire(&mut self, request: &AcquisitionRequest) -> Result<AccelSamples>;
}

/// True when this build can offer device acquisition.
pub fn hardware_available() -> bool {
    cfg!(feature = "simulated-daq")
}

/// Expands a channel specification into exactly three physical channel names.
///
/// Accepts a range form (`Dev1/ai0:2`), a comma separated list, or a single name.
pub fn parse_channels(spec: &str) -> Result<Vec<String>> {
    let spec = spec.trim();
    let channels: Vec<String> = if spec.contains(',') {
        spec.split(',')
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()
    } else if let Some((head, end)) = spec.rsplit_once(':') {
        let prefix_len = head.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        let (prefix, start) = head.split_at(prefix_len);
        let bad_range = || AnalysisError::Acquisition(format!("Invalid channel range '{}'", spec));
        let start: usize = start.parse().map_err(|_| bad_range())?;
        let end: usize = end.trim().parse().map_err(|_| bad_range())?;
        if end < start {
            return Err(bad_range());
        }
        (start..=end).map(|i| format!("{}{}", prefix, i)).collect()
    } else if spec.is_empty() {
        Vec::new()
    } else {
        vec![spec.to_string()]
    };

    if channels.len() != AXIS_COUNT {
        return Err(AnalysisError::Acquisition(format!(
            "Channel specification '{}' names {} channels, expected {}",
            spec,
            channels.len(),
            AXIS_COUNT
        )));
    }
    Ok(channels)
}

/// Deterministic stand-in for a shaker table and accelerometer.
///
/// Each axis behaves as a damped single degree of freedom oscillator driven
/// by a linear sine sweep. The response amplitude follows the steady state
/// transfer magnitude at the instantaneous sweep frequency.
#[derive(Debug, Clone)]
pub struct SimulatedShaker {
    pub natural_freq_hz: [f64; AXIS_COUNT],
    pub damping_ratio: f64,
    pub amplitude: f64,
}

impl Default for SimulatedShaker {
    fn default() -> Self {
        Self {
            natural_freq_hz: SHAKER_NATURAL_FREQ_HZ,
            damping_ratio: SHAKER_DAMPING_RATIO,
            amplitude: SHAKER_EXCITATION_AMPLITUDE,
        }
    }
}

impl SimulatedShaker {
    /// Magnitude and phase lag of the oscillator at `freq_hz`.
    fn response(&self, axis: usize, freq_hz: f64) -> (f64, f64) {
        let r = freq_hz / self.natural_freq_hz[axis];
        let real = 1.0 - r * r;
        let imag = 2.0 * self.damping_ratio * r;
        let magnitude = 1.0 / (real * real + imag * imag).sqrt();
        (magnitude, imag.atan2(real))
    }
}

impl AcquisitionDevice for SimulatedShaker {
    fn name(&self) -> &str {
        "Simulated shaker"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn acquire(&mut self, request: &AcquisitionRequest) -> Result<AccelSamples> {
        let channels = parse_channels(&request.channel)?;
        let n = request.sample_count();
        if n == 0 {
            return Err(AnalysisError::Acquisition(format!(
                "Duration {} s at {} Hz yields no samples",
                request.duration_s, request.sampling_rate
            )));
        }
        info!(
            "{}: acquiring {} samples on {:?}, sweep {:.1}-{:.1} Hz",
            self.name(),
            n,
            channels,
            request.sweep_start_hz,
            request.sweep_end_hz
        );

        let dt = 1.0 / request.sampling_rate;
        let f0 = request.sweep_start_hz;
        let sweep_rate = (request.sweep_end_hz - f0) / request.duration_s;

        let mut axes: [Vec<f64>; AXIS_COUNT] = Default::default();
        for (axis, samples) in axes.iter_mut().enumerate() {
            samples.reserve(n);
            for i in 0..n {
                let t = i as f64 * dt;
                let inst_freq = f0 + sweep_rate * t;
                let phase = 2.0 * PI * (f0 * t + 0.5 * sweep_rate * t * t);
                let (magnitude, lag) = self.response(axis, inst_freq);
                samples.push(
                    self.amplitude * SHAKER_AXIS_GAIN[axis] * magnitude * (phase - lag).sin(),
                );
            }
        }

        let [x, y, z] = axes;
        AccelSamples::new(x, y, z, 0)
    }
}
