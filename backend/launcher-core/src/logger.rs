//! Logging setup for hosts embedding the launcher.
//!
//! Colored stdout plus a plain `launcher.log`. Levels come from [`LauncherConfig`]:
//! `log_level` applies to this crate, other crates log warnings only, and raw
//! helper output is traced only when `log_helper_output` is set.

use crate::config::LauncherConfig;
use crate::error::logger::LoggerError;
use crate::launch::spawn::HELPER_OUTPUT_TARGET;

use common::ErrorLocation;

use std::fmt::{Arguments, Display};
use std::io::stdout;
use std::panic::Location;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use fern::{Dispatch, FormatCallback};
use humantime::format_rfc3339;
use log::{LevelFilter, Record, info, warn};

/// Set once a dispatch has been applied. A failed attempt leaves it unset.
static LOGGER_INITIALIZED: Mutex<bool> = Mutex::new(false);

pub const LOG_FILE_NAME: &str = "launcher.log";

const CRATE_TARGET: &str = "launcher_core";
const DEPENDENCY_LEVEL: LevelFilter = LevelFilter::Warn;

/// Install the global logger.
///
/// Calls after a successful initialization log a warning and return Ok, keeping
/// the levels of the first call.
///
/// # Errors
///
/// Returns an error if:
/// - Log file cannot be created
/// - Another global logger is already installed
pub fn initialize(log_dir: &Path, config: &LauncherConfig) -> Result<(), LoggerError> {
    let mut initialized = LOGGER_INITIALIZED
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    if *initialized {
        warn!("Logger already initialized");
        return Ok(());
    }

    let level = config.log_level_filter();
    initialize_internal(log_dir, level, config.log_helper_output)?;
    *initialized = true;
    info!(
        "Logger initialized with level: {level:?} (helper output: {})",
        config.log_helper_output
    );

    Ok(())
}

/// `[<rfc3339> - <LEVEL>] <message> [<file>:<line>]`
fn format_line(out: FormatCallback, message: &Arguments, record: &Record, level: impl Display) {
    out.finish(format_args!(
        "[{date} - {level}] {message} [{file}:{line}]",
        date = format_rfc3339(SystemTime::now()),
        file = record.file().unwrap_or("unknown"),
        line = record.line().unwrap_or(0),
    ))
}

#[track_caller]
fn initialize_internal(
    log_dir: &Path,
    level: LevelFilter,
    log_helper_output: bool,
) -> Result<(), LoggerError> {
    let log_file_path = log_dir.join(LOG_FILE_NAME);

    let colors = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    let helper_level = if log_helper_output {
        LevelFilter::Trace
    } else {
        LevelFilter::Off
    };

    let base_dispatch = Dispatch::new()
        .level(DEPENDENCY_LEVEL)
        .level_for(CRATE_TARGET, level)
        .level_for(HELPER_OUTPUT_TARGET, helper_level);

    let stdout_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            format_line(out, message, record, colors.color(record.level()))
        })
        .chain(stdout());

    let log_file = fern::log_file(&log_file_path).map_err(|e| LoggerError::LogFile {
        message: format!(
            "Failed to create log file {}: {e}",
            log_file_path.display()
        ),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let file_dispatch = Dispatch::new()
        .format(|out, message, record| format_line(out, message, record, record.level()))
        .chain(log_file);

    base_dispatch
        .chain(stdout_dispatch)
        .chain(file_dispatch)
        .apply()
        .map_err(|e| LoggerError::Dispatch {
            message: format!("Failed to initialize logger: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    Ok(())
}
