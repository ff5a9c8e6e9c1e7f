//! Initialisation of the application's logging system.
//!
//! Hadar is a library, so it does not configure logging globally at import time (unlike the
//! Python original, which set up `logging.basicConfig` as a side effect of `import hadar`).
//! Instead, [`init_from_env`] is an explicit call a host program makes once at startup; library
//! code itself only ever calls the `log` facade macros.
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::Arguments;
use std::io::IsTerminal;
use std::sync::OnceLock;

/// The environment variable used to configure the log level (§6.4).
pub const LOG_LEVEL_VAR: &str = "HADAR_LOG";

/// The default log level, used when `HADAR_LOG` is unset or unrecognised.
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

/// A flag indicating whether the logger has been initialised.
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// Whether the program logger has been initialised.
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Parse a log level string as accepted by `HADAR_LOG` (§6.4: `DEBUG`, `INFO`, `WARNING`, `ERROR`).
fn parse_level(level: &str) -> LevelFilter {
    match level.to_uppercase().as_str() {
        "DEBUG" => LevelFilter::Debug,
        "INFO" => LevelFilter::Info,
        "WARNING" | "WARN" => LevelFilter::Warn,
        "ERROR" => LevelFilter::Error,
        "OFF" => LevelFilter::Off,
        _ => DEFAULT_LOG_LEVEL,
    }
}

/// Initialise the logger from the `HADAR_LOG` environment variable, defaulting to `WARNING`.
///
/// Calling this more than once is harmless; only the first call takes effect.
pub fn init_from_env() {
    let level = env::var(LOG_LEVEL_VAR)
        .map(|v| parse_level(&v))
        .unwrap_or(DEFAULT_LOG_LEVEL);
    init(level);
}

/// Initialise the logger at a specific level, bypassing the environment variable.
pub fn init(level: LevelFilter) {
    if LOGGER_INIT.get().is_some() {
        return;
    }

    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    let use_colour_stdout = std::io::stdout().is_terminal();
    let use_colour_stderr = std::io::stderr().is_terminal();

    let dispatch = Dispatch::new()
        .chain(
            Dispatch::new()
                .filter(|metadata| metadata.level() > LevelFilter::Warn)
                .format(move |out, message, record| {
                    write_log(out, message, record, use_colour_stdout, &colours);
                })
                .level(level)
                .chain(std::io::stdout()),
        )
        .chain(
            Dispatch::new()
                .format(move |out, message, record| {
                    write_log(out, message, record, use_colour_stderr, &colours);
                })
                .level(level.min(LevelFilter::Warn))
                .chain(std::io::stderr()),
        );

    // Ignore failure: a concurrent call to `fern`'s global dispatch would lose the race
    // harmlessly, and `LOGGER_INIT` already prevents that in the common case.
    let _ = dispatch.apply();
    let _ = LOGGER_INIT.set(());
}

fn write_log(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    use_colour: bool,
    colours: &ColoredLevelConfig,
) {
    let timestamp = chrono::Local::now().format("%H:%M:%S");
    if use_colour {
        out.finish(format_args!(
            "[{timestamp} {} {}] {message}",
            colours.color(record.level()),
            record.target()
        ));
    } else {
        out.finish(format_args!(
            "[{timestamp} {} {}] {message}",
            record.level(),
            record.target()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("info"), LevelFilter::Info);
        assert_eq!(parse_level("Warning"), LevelFilter::Warn);
        assert_eq!(parse_level("error"), LevelFilter::Error);
        assert_eq!(parse_level("nonsense"), DEFAULT_LOG_LEVEL);
    }
}
