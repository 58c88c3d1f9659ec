//! Internal logging system for the Galaxy3D spatial index
//!
//! This module provides a flexible logging system with:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - A global severity threshold (Info by default)
//! - Colored console output by default
//! - File and line information for detailed ERROR logs

use colored::*;
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// Implement this trait to redirect index diagnostics (file logging,
/// in-memory capture in tests, etc.)
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_spatial::galaxy3d::log::{Logger, LogEntry};
///
/// struct FileLogger {
///     file: std::fs::File,
/// }
///
/// impl Logger for FileLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Write to file...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level (Trace, Debug, Info, Warn, Error)
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "galaxy3d::Tree", "galaxy3d::Picker")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Per-node traversal details
    Trace,

    /// Build statistics, cache misses
    Debug,

    /// Important informational messages
    Info,

    /// Warning messages (overfull leaves, etc.)
    Warn,

    /// Error messages (with file:line details)
    Error,
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        // Format timestamp as YYYY-MM-DD HH:MM:SS.mmm
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity_str = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            println!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp,
                severity_str,
                source,
                entry.message,
                file,
                line
            );
        } else {
            println!(
                "[{}] [{}] [{}] {}",
                timestamp,
                severity_str,
                source,
                entry.message
            );
        }
    }
}

// ===== GLOBAL LOGGER =====

/// Global logger state (initialized lazily with DefaultLogger)
static LOGGER: OnceLock<RwLock<LoggerState>> = OnceLock::new();

struct LoggerState {
    logger: Box<dyn Logger>,
    max_severity: LogSeverity,
}

fn logger_state() -> &'static RwLock<LoggerState> {
    LOGGER.get_or_init(|| RwLock::new(LoggerState {
        logger: Box::new(DefaultLogger),
        max_severity: LogSeverity::Info,
    }))
}

/// Replace the global logger.
///
/// The severity threshold is left unchanged.
pub fn set_logger<L: Logger + 'static>(logger: L) {
    if let Ok(mut state) = logger_state().write() {
        state.logger = Box::new(logger);
    }
}

/// Restore the DefaultLogger and the default `Info` threshold.
pub fn reset_logger() {
    if let Ok(mut state) = logger_state().write() {
        state.logger = Box::new(DefaultLogger);
        state.max_severity = LogSeverity::Info;
    }
}

/// Set the lowest severity that reaches the logger.
///
/// Entries below `severity` are dropped before a `LogEntry` is built.
pub fn set_max_severity(severity: LogSeverity) {
    if let Ok(mut state) = logger_state().write() {
        state.max_severity = severity;
    }
}

/// Current severity threshold
pub fn max_severity() -> LogSeverity {
    logger_state()
        .read()
        .map(|state| state.max_severity)
        .unwrap_or(LogSeverity::Info)
}

/// Whether an entry of `severity` would be forwarded to the logger.
pub fn enabled(severity: LogSeverity) -> bool {
    severity >= max_severity()
}

/// Log a message without file:line information.
///
/// Used by `spatial_trace!` through `spatial_warn!`.
pub fn log(severity: LogSeverity, source: &str, message: String) {
    dispatch(severity, source, message, None, None);
}

/// Log a message with file:line information (ERROR logs).
pub fn log_detailed(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: &'static str,
    line: u32,
) {
    dispatch(severity, source, message, Some(file), Some(line));
}

fn dispatch(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: Option<&'static str>,
    line: Option<u32>,
) {
    if let Ok(state) = logger_state().read() {
        if severity < state.max_severity {
            return;
        }
        state.logger.log(&LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file,
            line,
        });
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message (per-node details, disabled by default)
///
/// The message is only formatted when TRACE is enabled.
#[macro_export]
macro_rules! spatial_trace {
    ($source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::galaxy3d::log::LogSeverity::Trace) {
            $crate::log::log(
                $crate::galaxy3d::log::LogSeverity::Trace,
                $source,
                format!($($arg)*)
            )
        }
    };
}

/// Log a DEBUG message (build statistics, cache activity)
#[macro_export]
macro_rules! spatial_debug {
    ($source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::galaxy3d::log::LogSeverity::Debug) {
            $crate::log::log(
                $crate::galaxy3d::log::LogSeverity::Debug,
                $source,
                format!($($arg)*)
            )
        }
    };
}

/// Log an INFO message
#[macro_export]
macro_rules! spatial_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::galaxy3d::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message
///
/// # Example
///
/// ```ignore
/// spatial_warn!("galaxy3d::Tree", "Leaf {} holds {} items", node, count);
/// ```
#[macro_export]
macro_rules! spatial_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::galaxy3d::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! spatial_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log_detailed(
            $crate::galaxy3d::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
