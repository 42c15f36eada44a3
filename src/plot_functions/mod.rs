// src/plot_functions/mod.rs

pub mod plot_axis_psd;
pub mod plot_psd_total;

// src/plot_functions/mod.rs
