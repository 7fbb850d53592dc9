//! Logging sink for the engine.
//!
//! A pluggable [`Logger`] receives every [`LogEntry`] emitted through the
//! `engine_*!` macros. The default implementation prints colored, timestamped
//! lines to stdout; error-severity entries additionally carry `file:line`.

use chrono::{DateTime, Local};
use colored::*;
use std::time::SystemTime;

/// Implement to redirect engine logs (file, network, in-memory buffer, ...).
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

/// One structured log record.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    pub source: String,
    pub message: String,
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Colored console logger, installed by default.
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
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
                "[{timestamp}] [{severity_str}] [{source}] {} ({file}:{line})",
                entry.message
            );
        } else {
            println!("[{timestamp}] [{severity_str}] [{source}] {}", entry.message);
        }
    }
}

#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::engine::Engine::log(
            $crate::log::LogSeverity::Trace, $source, format!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::engine::Engine::log(
            $crate::log::LogSeverity::Debug, $source, format!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::engine::Engine::log(
            $crate::log::LogSeverity::Info, $source, format!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::engine::Engine::log(
            $crate::log::LogSeverity::Warn, $source, format!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::engine::Engine::log_detailed(
            $crate::log::LogSeverity::Error, $source, format!($($arg)*),
            file!(), line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
