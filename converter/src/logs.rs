//! Pipeline logging.
//!
//! Log entries carry a level and an optional indentation level for nested
//! steps, and are emitted through `tracing` so the CLI decides where they go
//! and how much is shown.

use tracing_subscriber::{fmt, EnvFilter};

/// Log level for pipeline messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Success,
}

/// A single log entry
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Indentation level (for nested logs)
    pub indent: u8,
}

impl LogEntry {
    pub fn debug(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Debug, message: message.into(), indent: 0 }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Message with its level marker and indentation applied.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Debug | LogLevel::Info => "",
            LogLevel::Success => "✓ ",
        };
        format!("{}{}{}", "   ".repeat(self.indent as usize), prefix, self.message)
    }
}

/// Emit a log entry through `tracing`.
pub fn log(entry: LogEntry) {
    let line = entry.render();
    match entry.level {
        LogLevel::Debug => tracing::debug!("{}", line),
        LogLevel::Info | LogLevel::Success => tracing::info!("{}", line),
    }
}

/// Convenient logging functions
pub fn log_debug(msg: impl Into<String>) {
    log(LogEntry::debug(msg));
}

pub fn log_info(msg: impl Into<String>) {
    log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    log(LogEntry::success(msg));
}

pub fn log_debug_indent(msg: impl Into<String>, indent: u8) {
    log(LogEntry::debug(msg).with_indent(indent));
}

/// Default filter directive for a verbosity count (`-v` flags minus `-q`).
pub fn default_directive(verbosity: i8) -> &'static str {
    match verbosity {
        i8::MIN..=-1 => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over the verbosity flags.
///
/// Calling it twice is harmless; the second install is ignored.
pub fn init_logging(verbosity: i8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
