// src/data_input/mod.rs

pub mod accel_data;
pub mod csv_loader;
pub mod device;
pub mod source;
pub mod upload;

// src/data_input/mod.rs
