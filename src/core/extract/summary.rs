//! Extraction summary and reporting

use crate::core::aggregate::AggregateOutput;
use std::time::Duration;

/// Summary of an extraction run
#[derive(Debug, Clone, Default)]
pub struct ExtractionSummary {
    /// Days in the requested range
    pub days_total: usize,

    /// Days whose listing succeeded
    pub days_processed: usize,

    /// Days whose listing failed
    pub days_failed: usize,

    /// Order codes returned by the listings
    pub orders_listed: usize,

    /// Orders fetched successfully
    pub orders_fetched: usize,

    /// Orders whose detail could not be fetched
    pub orders_failed: usize,

    /// Orders left out because of an unparseable quantity
    pub orders_skipped: usize,

    /// Line items seen across fetched orders
    pub items_seen: usize,

    /// Medication line items folded into the aggregate
    pub medication_items: usize,

    /// Duration of the extraction
    pub duration: Duration,

    /// Errors encountered during extraction
    pub errors: Vec<ExtractionError>,

    /// A shutdown signal stopped the run before the range was covered
    pub interrupted: bool,

    /// Ranked totals and audit records
    pub output: AggregateOutput,
}

impl ExtractionSummary {
    /// Create a new empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: ExtractionError) {
        self.errors.push(error);
    }

    /// No listing or order fetch failed
    ///
    /// Orders skipped for quantity errors do not count as failures.
    pub fn is_successful(&self) -> bool {
        self.days_failed == 0 && self.orders_failed == 0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        crate::log_extraction_complete!(self);

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Extraction completed with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    message = %error.message,
                    context = error.context.as_deref().unwrap_or(""),
                    "Extraction error"
                );
            }
        }
    }
}

/// Type of extraction error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionErrorType {
    /// A day listing failed
    Listing,
    /// An order detail could not be fetched or decoded
    Fetch,
    /// An order was skipped for an unparseable quantity
    Quantity,
}

/// Extraction error with context
#[derive(Debug, Clone)]
pub struct ExtractionError {
    /// Type of error
    pub error_type: ExtractionErrorType,

    /// Error message
    pub message: String,

    /// Optional context (e.g. date, order code)
    pub context: Option<String>,
}

impl ExtractionError {
    /// Create a new extraction error
    pub fn new(error_type: ExtractionErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            context: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_creation() {
        let summary = ExtractionSummary::new();

        assert_eq!(summary.days_total, 0);
        assert_eq!(summary.orders_fetched, 0);
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(summary.errors.is_empty());
        assert!(!summary.interrupted);
        assert!(summary.output.is_empty());
    }

    #[test]
    fn test_summary_with_duration() {
        let summary = ExtractionSummary::new().with_duration(Duration::from_secs(90));
        assert_eq!(summary.duration, Duration::from_secs(90));
    }

    #[test]
    fn test_is_successful() {
        let mut summary = ExtractionSummary::new();
        summary.orders_skipped = 2;
        summary.add_error(ExtractionError::new(
            ExtractionErrorType::Quantity,
            "invalid quantity 'x'".to_string(),
        ));
        assert!(summary.is_successful());

        summary.orders_failed = 1;
        assert!(!summary.is_successful());

        summary.orders_failed = 0;
        summary.days_failed = 1;
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_error_with_context() {
        let error = ExtractionError::new(ExtractionErrorType::Fetch, "timeout".to_string())
            .with_context("order_code=1057-123-SE24".to_string());

        assert_eq!(error.error_type, ExtractionErrorType::Fetch);
        assert_eq!(error.context.as_deref(), Some("order_code=1057-123-SE24"));
    }
}
