//! Structured console logging
//!
//! Lightweight logger with leveled, optionally colored output and a
//! per-process correlation ID so repeated runs can be told apart in
//! captured terminal logs.

use crate::error::{AppError, Result};
use chrono::Utc;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[36m", // Cyan
            LogLevel::Info => "\x1b[32m",  // Green
            LogLevel::Warn => "\x1b[33m",  // Yellow
            LogLevel::Error => "\x1b[31m", // Red
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Console logger with level filtering
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    correlation_id: String,
}

impl Logger {
    /// Create a logger; debug mode lowers the threshold to Debug
    pub fn new(debug: bool, use_color: bool) -> Self {
        Self {
            min_level: if debug { LogLevel::Debug } else { LogLevel::Info },
            use_color,
            correlation_id: Uuid::new_v4().to_string()[..8].to_string(),
        }
    }

    /// The short correlation ID stamped onto every entry
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    fn emit(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%H:%M:%S%.3f");
        let line = if self.use_color {
            format!(
                "{} {}{:<5}{} [{}] {}",
                timestamp,
                level.color_code(),
                level.as_str(),
                LogLevel::reset_code(),
                self.correlation_id,
                message
            )
        } else {
            format!(
                "{} {:<5} [{}] {}",
                timestamp,
                level.as_str(),
                self.correlation_id,
                message
            )
        };

        if level >= LogLevel::Warn {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    pub fn debug(&self, message: &str) {
        self.emit(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.emit(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.emit(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.emit(LogLevel::Error, message);
    }
}
