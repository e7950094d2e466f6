//! `log` backend that speaks the workflow command syntax.
//!
//! Warnings and errors become annotations on the run, debug lines only show
//! up when step debugging is enabled, and info lines are printed as-is.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::io::Write;

/// Logger writing workflow commands to stdout.
pub struct ActionsLogger {
    level: LevelFilter,
}

impl ActionsLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// Install as the global logger. Later calls are ignored.
    pub fn init(level: LevelFilter) {
        if log::set_boxed_logger(Box::new(Self::new(level))).is_ok() {
            log::set_max_level(level);
        }
    }
}

impl Log for ActionsLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record.level(), &record.args().to_string());
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", line);
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

/// Render one message for the runner.
pub fn format_record(level: Level, message: &str) -> String {
    match level {
        Level::Error => format!("::error::{}", escape_data(message)),
        Level::Warn => format!("::warning::{}", escape_data(message)),
        Level::Info => message.to_string(),
        Level::Debug | Level::Trace => format!("::debug::{}", escape_data(message)),
    }
}

/// Escape command data so it stays on one line.
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
