//! Subscriber installation
//!
//! Console output goes to stderr so the top-N table printed on stdout stays
//! clean. Optional JSON log files rotate through `tracing-appender`.

use crate::config::LoggingConfig;
use crate::domain::{MedTallyError, Result};
use std::str::FromStr;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log file name prefix inside `logging.local_path`
pub const LOG_FILE_NAME: &str = "medtally.log";

/// Keeps the non-blocking file writer alive; dropping it flushes pending lines
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _writer: Option<WorkerGuard>,
}

/// Installs the global subscriber
///
/// `RUST_LOG` wins over `level` when set.
///
/// # Errors
///
/// Returns a configuration error for an unknown level, an unwritable log
/// directory, or when a global subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// use medtally::logging::init_logging;
/// use medtally::config::LoggingConfig;
///
/// let _guard = init_logging("debug", &LoggingConfig::default()).expect("logging");
/// ```
pub fn init_logging(level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(level)?;
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("medtally={level}")))
    };

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter());

    let (file, writer_guard) = if config.local_enabled {
        let (writer, guard) = tracing_appender::non_blocking(file_appender(config)?);
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_thread_ids(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(filter());
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| MedTallyError::Configuration(format!("Failed to install logger: {e}")))?;

    tracing::debug!(
        level = %level,
        local_enabled = config.local_enabled,
        local_path = %config.local_path,
        rotation = %config.local_rotation,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _writer: writer_guard,
    })
}

fn file_appender(config: &LoggingConfig) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(&config.local_path).map_err(|e| {
        MedTallyError::Configuration(format!(
            "Cannot create log directory {}: {e}",
            config.local_path
        ))
    })?;

    Ok(RollingFileAppender::new(
        rotation_for(&config.local_rotation),
        &config.local_path,
        LOG_FILE_NAME,
    ))
}

fn rotation_for(name: &str) -> Rotation {
    match name {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

/// Level names are case-insensitive
fn parse_log_level(name: &str) -> Result<Level> {
    Level::from_str(name.trim()).map_err(|_| {
        MedTallyError::Configuration(format!(
            "Invalid log level '{name}', expected trace, debug, info, warn or error"
        ))
    })
}
