// src/logger.rs

use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Installs the terminal logger. Safe to call more than once; later calls are ignored.
pub fn init_logger(level: LevelFilter) {
    if TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .is_err()
    {
        log::debug!("Logger already initialised");
    }
}
