use log::LevelFilter;
use syslog::{BasicLogger, Facility, Formatter3164};
use thiserror::Error;

const IDENT: &str = "audiomon";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to connect to syslog: {0}")]
    Syslog(String),

    #[error("logger already installed: {0}")]
    AlreadySet(#[from] log::SetLoggerError),
}

/// Install the global logger: syslog (user facility) or the console.
///
/// The console logger honours `RUST_LOG` and defaults to `info`.
pub fn init(use_syslog: bool) -> Result<(), LoggingError> {
    if !use_syslog {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init()?;
        return Ok(());
    }

    let formatter = Formatter3164 {
        facility: Facility::LOG_USER,
        hostname: None,
        process: IDENT.into(),
        pid: std::process::id(),
    };
    let logger = syslog::unix(formatter).map_err(|e| LoggingError::Syslog(e.to_string()))?;
    log::set_boxed_logger(Box::new(BasicLogger::new(logger)))?;
    log::set_max_level(LevelFilter::Info);
    Ok(())
}
