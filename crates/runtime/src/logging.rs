use std::sync::OnceLock;

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::config::{PROGRAM_LOG_LEVEL, PROGRAM_NAME};

/// Stderr logger for the scanner, the monitor and the CLI.
pub struct Logger {
    level: Level,
}

impl Logger {
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    fn render(&self, record: &Record<'_>) -> String {
        format!(
            "{} {:<5} [{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            short_target(record.target()),
            record.args()
        )
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", self.render(record));
        }
    }

    fn flush(&self) {}
}

/// `shadowtrace_fs::scanner` -> `fs::scanner`. Foreign targets are left alone.
fn short_target(target: &str) -> &str {
    target
        .strip_prefix(PROGRAM_NAME)
        .and_then(|rest| rest.strip_prefix('_'))
        .unwrap_or(target)
}

/// Case-insensitive level name. `off` is not a level a message can be logged
/// at, so it counts as unknown.
pub fn parse_level(value: &str) -> Option<Level> {
    value
        .trim()
        .parse::<LevelFilter>()
        .ok()
        .and_then(|filter| filter.to_level())
}

/// An explicit level wins, then the environment value, then `warn`.
pub fn resolve_level(explicit: Option<Level>, env_value: Option<&str>) -> Level {
    explicit
        .or_else(|| env_value.and_then(parse_level))
        .unwrap_or(Level::Warn)
}

fn env_level() -> Option<String> {
    std::env::var(PROGRAM_LOG_LEVEL).ok()
}

/// Install the logger at the level named by `SHADOWTRACE_LOG_LEVEL`.
pub fn init() -> Result<(), SetLoggerError> {
    init_with(None)
}

/// Like [`init`], but `level` (e.g. from `--log-level`) takes precedence.
pub fn init_with(level: Option<Level>) -> Result<(), SetLoggerError> {
    install(resolve_level(level, env_level().as_deref()))
}

fn install(level: Level) -> Result<(), SetLoggerError> {
    static LOGGER: OnceLock<Logger> = OnceLock::new();

    // A second call keeps the first level; the logger and max_level must agree.
    if LOGGER.get().is_some() {
        return Ok(());
    }

    let logger = LOGGER.get_or_init(|| Logger::new(level));
    log::set_logger(logger)?;
    log::set_max_level(logger.level().to_level_filter());
    Ok(())
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
