//! `log` backend that renders records as workflow commands.
//!
//! GitHub Actions runners interpret specially formatted stdout lines:
//! `::debug::`, `::warning::` and `::error::` annotate the job log, while
//! plain lines are shown verbatim. [`ActionsLogger`] maps `log` levels onto
//! those commands so diagnostics use the ordinary `log` macros.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

/// Logger that writes workflow commands to stdout.
#[derive(Debug, Clone, Copy)]
pub struct ActionsLogger {
    level: LevelFilter,
}

impl ActionsLogger {
    /// Create a logger that emits records up to `level`.
    #[must_use]
    pub const fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

impl Log for ActionsLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_command(record.level(), &record.args().to_string());
        let mut stdout = std::io::stdout().lock();
        if writeln!(stdout, "{line}").is_err() {
            // Nowhere left to report a failing stdout.
        }
    }

    fn flush(&self) {
        if std::io::stdout().flush().is_err() {
            // As above.
        }
    }
}

/// Install [`ActionsLogger`] as the global logger.
///
/// With `debug` set, debug records are emitted (the runner hides them unless
/// step debugging is enabled); otherwise only info and above.
///
/// # Errors
///
/// Returns an error if a global logger was already installed.
pub fn init(debug: bool) -> Result<(), SetLoggerError> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    log::set_boxed_logger(Box::new(ActionsLogger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}

/// Render a message at `level` as a single workflow-command line.
///
/// # Examples
///
/// ```
/// use artefact_fetcher::logging::format_command;
/// use log::Level;
///
/// assert_eq!(format_command(Level::Warn, "two\nlines"), "::warning::two%0Alines");
/// assert_eq!(format_command(Level::Info, "plain"), "plain");
/// ```
#[must_use]
pub fn format_command(level: Level, message: &str) -> String {
    match level {
        Level::Error => format!("::error::{}", escape_data(message)),
        Level::Warn => format!("::warning::{}", escape_data(message)),
        Level::Info => message.to_owned(),
        Level::Debug | Level::Trace => format!("::debug::{}", escape_data(message)),
    }
}

/// Escape a workflow-command message so it stays on one line.
#[must_use]
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::error(Level::Error, "boom", "::error::boom")]
    #[case::warn(Level::Warn, "careful", "::warning::careful")]
    #[case::info(Level::Info, "hello", "hello")]
    #[case::debug(Level::Debug, "detail", "::debug::detail")]
    #[case::trace(Level::Trace, "noise", "::debug::noise")]
    fn maps_levels_to_commands(#[case] level: Level, #[case] message: &str, #[case] expected: &str) {
        assert_eq!(format_command(level, message), expected);
    }

    #[rstest]
    #[case::percent("100%", "100%25")]
    #[case::crlf("a\r\nb", "a%0D%0Ab")]
    #[case::encoded_input("%0A", "%250A")]
    #[case::untouched("plain text", "plain text")]
    fn escapes_command_data(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(escape_data(raw), expected);
    }

    #[rstest]
    #[case::info_hides_debug(LevelFilter::Info, Level::Debug, false)]
    #[case::info_shows_warn(LevelFilter::Info, Level::Warn, true)]
    #[case::debug_shows_debug(LevelFilter::Debug, Level::Debug, true)]
    #[case::debug_hides_trace(LevelFilter::Debug, Level::Trace, false)]
    fn honours_level_filter(
        #[case] filter: LevelFilter,
        #[case] level: Level,
        #[case] enabled: bool,
    ) {
        let logger = ActionsLogger::new(filter);
        let metadata = Metadata::builder().level(level).build();
        assert_eq!(logger.enabled(&metadata), enabled);
    }
}
