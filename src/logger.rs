use log::{LevelFilter, SetLoggerError};
use simplelog::{ConfigBuilder, WriteLogger};

/// Maps the `-v` count to a level; warnings and errors are always shown.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Logs to stderr; stdout belongs to the checkout screens.
pub fn setup_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("checkout_wizard")
        .build();

    WriteLogger::init(level, logger_config, std::io::stderr())
}
