use log::{Level, LevelFilter, SetLoggerError};
use std::io::Write;
use std::str::FromStr;

/// The environment variable selecting the maximum log level.
pub const LOG_LEVEL_VAR: &str = "RUST_LOG";

/// Writes log records to stderr, keeping stdout free for the generated code.
pub struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl StderrLogger {
    /// Installs the logger with the level taken from [`LOG_LEVEL_VAR`].
    pub fn init() -> Result<(), SetLoggerError> {
        let level = parse_level(std::env::var(LOG_LEVEL_VAR).ok().as_deref());
        log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
    }
}

/// Parses a level name such as `debug`; unset or unknown values select `warn`.
fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or(LevelFilter::Warn)
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let label = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARN ",
            Level::Info => "INFO ",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };

        // Nothing sensible can be done if stderr is gone.
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{label} {}] {}",
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
