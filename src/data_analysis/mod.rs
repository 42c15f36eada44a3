// src/data_analysis/mod.rs

pub mod fft_utils;
pub mod peak_detection;
pub mod psd_analysis;
pub mod spectral_analysis;

// src/data_analysis/mod.rs
