//! Date-range extraction
//!
//! - [`coordinator`] - walks the date range through an [`OrderSource`](crate::adapters::OrderSource)
//! - [`summary`] - counters, errors and the aggregate of a run

pub mod coordinator;
pub mod summary;

pub use coordinator::ExtractionCoordinator;
pub use summary::{ExtractionError, ExtractionErrorType, ExtractionSummary};
