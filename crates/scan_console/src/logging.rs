//! Logging initialization for the console host.
//!
//! File output goes to `./scan_console.log` in the current working directory.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILENAME: &str = "./scan_console.log";

/// Destination for log output.
pub enum LogDestination {
    /// Write to the terminal (stderr for warnings and errors).
    Terminal,
    /// Write to the terminal and to `./scan_console.log`.
    Both,
}

/// Initialize the logger with the specified destination and level.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let LogDestination::Both = destination {
        if let Some(file_logger) = create_file_logger(level, config) {
            loggers.push(file_logger);
        }
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    let log_path = PathBuf::from(LOG_FILENAME);
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}
