//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels (`RUST_LOG` or the configured level)
//! - Console output on stderr
//! - JSON log files with daily/hourly rotation
//!
//! # Example
//!
//! ```no_run
//! use medtally::logging::init_logging;
//! use medtally::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(date = "2024-07-01", "Processing day");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard, LOG_FILE_NAME};

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use medtally::log_retry_attempt;
///
/// log_retry_attempt!(1, 3, 1000u64, "Connection timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $delay_ms:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay_ms,
            reason = %$reason,
            "Retrying request after error"
        );
    };
}

/// Log the end of a day's processing
///
/// # Example
///
/// ```no_run
/// use medtally::log_day_complete;
///
/// log_day_complete!("2024-07-01", 42usize, 7usize);
/// ```
#[macro_export]
macro_rules! log_day_complete {
    ($date:expr, $orders:expr, $medication_items:expr) => {
        tracing::info!(
            date = %$date,
            orders = $orders,
            medication_items = $medication_items,
            "Day completed"
        );
    };
}

/// Log the totals of an extraction run
///
/// Takes anything with the counters of
/// [`ExtractionSummary`](crate::core::extract::ExtractionSummary).
#[macro_export]
macro_rules! log_extraction_complete {
    ($summary:expr) => {
        tracing::info!(
            days_processed = $summary.days_processed,
            days_failed = $summary.days_failed,
            orders_fetched = $summary.orders_fetched,
            orders_failed = $summary.orders_failed,
            orders_skipped = $summary.orders_skipped,
            medication_items = $summary.medication_items,
            medication_keys = $summary.output.ranked.len(),
            duration_ms = $summary.duration.as_millis() as u64,
            interrupted = $summary.interrupted,
            "Extraction completed"
        );
    };
}
