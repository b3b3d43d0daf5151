use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record};

/// Verbosity levels understood by the demo front end
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Nothing = 0,
    Error = 1,
    Warning = 2,
    Info = 3,
    Debug = 4,
    All = 5,
}

impl LogLevel {
    /// Create a LogLevel from an integer
    pub fn from_i32(level: i32) -> Self {
        match level {
            0 => LogLevel::Nothing,
            1 => LogLevel::Error,
            2 => LogLevel::Warning,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            5 => LogLevel::All,
            _ => LogLevel::Info,
        }
    }

    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// Map a count of `-v` flags onto a level, starting from warnings.
    pub fn from_verbosity(count: u8) -> Self {
        match count {
            0 => LogLevel::Warning,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::All,
        }
    }

    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Nothing => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::All => LevelFilter::Trace,
        }
    }
}

/// `log` backend that writes one line per record to stderr
#[derive(Debug)]
pub struct StderrLogger {
    filter: LevelFilter,
}

impl StderrLogger {
    pub fn new(level: LogLevel) -> Self {
        Self {
            filter: level.to_level_filter(),
        }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        // nowhere left to report a failed write
        let _ = writeln!(
            stderr,
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install the stderr logger as the global `log` backend.
///
/// Fails if a logger was already installed.
pub fn init(level: LogLevel) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(StderrLogger::new(level)))?;
    log::set_max_level(level.to_level_filter());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_log_level_from_i32() {
        assert_eq!(LogLevel::from_i32(0), LogLevel::Nothing);
        assert_eq!(LogLevel::from_i32(1), LogLevel::Error);
        assert_eq!(LogLevel::from_i32(2), LogLevel::Warning);
        assert_eq!(LogLevel::from_i32(3), LogLevel::Info);
        assert_eq!(LogLevel::from_i32(4), LogLevel::Debug);
        assert_eq!(LogLevel::from_i32(5), LogLevel::All);
    }

    #[test]
    fn test_log_level_as_i32() {
        assert_eq!(LogLevel::Nothing.as_i32(), 0);
        assert_eq!(LogLevel::Warning.as_i32(), 2);
        assert_eq!(LogLevel::All.as_i32(), 5);
    }

    #[test]
    fn test_log_level_invalid() {
        // Invalid values should default to Info
        assert_eq!(LogLevel::from_i32(100), LogLevel::Info);
        assert_eq!(LogLevel::from_i32(-1), LogLevel::Info);
    }

    #[test]
    fn test_from_verbosity() {
        assert_eq!(LogLevel::from_verbosity(0), LogLevel::Warning);
        assert_eq!(LogLevel::from_verbosity(1), LogLevel::Info);
        assert_eq!(LogLevel::from_verbosity(2), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbosity(9), LogLevel::All);
    }

    #[test]
    fn test_logger_filters_by_level() {
        let logger = StderrLogger::new(LogLevel::Info);
        let meta = |level| Metadata::builder().level(level).target("bitblt").build();
        assert!(logger.enabled(&meta(Level::Error)));
        assert!(logger.enabled(&meta(Level::Info)));
        assert!(!logger.enabled(&meta(Level::Debug)));

        let silent = StderrLogger::new(LogLevel::Nothing);
        assert!(!silent.enabled(&meta(Level::Error)));
    }
}
