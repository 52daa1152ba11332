use std::sync::atomic::AtomicU8;

use crate::bindings::{jsLog, LogLevel};

static MAX_LOG_LEVEL: AtomicU8 = AtomicU8::new(3);

/// Levels under which the `Logger` can be configured.
///
/// Logs with a level strictly higher than the configured one are not
/// forwarded to the JavaScript-side.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum LoggerLevel {
    None = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl From<LogLevel> for LoggerLevel {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => LoggerLevel::Error,
            LogLevel::Warn => LoggerLevel::Warn,
            LogLevel::Info => LoggerLevel::Info,
            LogLevel::Debug => LoggerLevel::Debug,
        }
    }
}

/// Logging facade forwarding to the `jsLog` binding, filtered by a
/// process-wide maximum level.
pub struct Logger {}

impl Logger {
    pub fn set_logger_level(new_level: LoggerLevel) {
        MAX_LOG_LEVEL.store(new_level as u8, std::sync::atomic::Ordering::Relaxed);
    }

    pub fn error(text: &str) {
        if MAX_LOG_LEVEL.load(std::sync::atomic::Ordering::Relaxed) >= LoggerLevel::Error as u8 {
            jsLog(LogLevel::Error, text);
        }
    }

    pub fn warn(text: &str) {
        if MAX_LOG_LEVEL.load(std::sync::atomic::Ordering::Relaxed) >= LoggerLevel::Warn as u8 {
            jsLog(LogLevel::Warn, text);
        }
    }

    pub fn info(text: &str) {
        if MAX_LOG_LEVEL.load(std::sync::atomic::Ordering::Relaxed) >= LoggerLevel::Info as u8 {
            jsLog(LogLevel::Info, text);
        }
    }

    pub fn debug(text: &str) {
        if MAX_LOG_LEVEL.load(std::sync::atomic::Ordering::Relaxed) >= LoggerLevel::Debug as u8 {
            jsLog(LogLevel::Debug, text);
        }
    }

    pub fn lazy_info(func: &dyn Fn() -> String) {
        if MAX_LOG_LEVEL.load(std::sync::atomic::Ordering::Relaxed) >= LoggerLevel::Info as u8 {
            jsLog(LogLevel::Info, &func());
        }
    }

    pub fn lazy_debug(func: &dyn Fn() -> String) {
        if MAX_LOG_LEVEL.load(std::sync::atomic::Ordering::Relaxed) >= LoggerLevel::Debug as u8 {
            jsLog(LogLevel::Debug, &func());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_logs_not_formatted_under_level() {
        Logger::set_logger_level(LoggerLevel::None);
        Logger::lazy_info(&|| unreachable!("message should not be formatted"));
        Logger::lazy_debug(&|| unreachable!("message should not be formatted"));
        Logger::set_logger_level(LoggerLevel::Info);
        Logger::lazy_debug(&|| unreachable!("message should not be formatted"));
    }
}
