// src/lib.rs - Library interface for internal module access

pub mod axis_names;
pub mod config;
pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod data_output;
pub mod error;
pub mod logger;
pub mod plot_framework;
pub mod plot_functions;
