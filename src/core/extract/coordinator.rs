//! Extraction coordinator - walks the date range and feeds the aggregator
//!
//! For every day of the range the coordinator lists the order codes, fetches
//! each order, keeps the medication items and folds them order by order into
//! a per-day [`Aggregator`]. Days may run concurrently; their partial
//! aggregates are merged in calendar order, so the result is the same as a
//! sequential run.

use crate::adapters::OrderSource;
use crate::config::ExtractConfig;
use crate::core::aggregate::Aggregator;
use crate::core::extract::summary::{ExtractionError, ExtractionErrorType, ExtractionSummary};
use crate::core::medication::classify;
use crate::domain::{LineItem, MedTallyError, Result};
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Result of processing one day
#[derive(Debug, Default)]
struct DayOutcome {
    started: bool,
    listing_failed: bool,
    interrupted: bool,
    orders_listed: usize,
    orders_fetched: usize,
    orders_failed: usize,
    orders_skipped: usize,
    items_seen: usize,
    aggregator: Aggregator,
    errors: Vec<ExtractionError>,
}

/// Extraction coordinator
pub struct ExtractionCoordinator {
    config: ExtractConfig,
    source: Arc<dyn OrderSource>,
    shutdown_signal: watch::Receiver<bool>,
}

impl ExtractionCoordinator {
    /// Create a new extraction coordinator
    pub fn new(
        config: ExtractConfig,
        source: Arc<dyn OrderSource>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            source,
            shutdown_signal,
        }
    }

    /// Execute the extraction
    ///
    /// This is the main entry point. It:
    /// 1. Validates the date range
    /// 2. Processes up to `parallel_days` days at a time
    /// 3. Merges the per-day aggregates in date order
    /// 4. Ranks the totals and builds the summary
    ///
    /// Listing and fetch failures are recorded in the summary and the run
    /// moves on. A shutdown signal stops new days from starting; whatever was
    /// folded so far is still returned.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the range is invalid.
    pub async fn execute_extraction(&self) -> Result<ExtractionSummary> {
        let start_time = Instant::now();

        self.config
            .validate()
            .map_err(MedTallyError::Configuration)?;

        let days = self.config.days();
        let mut summary = ExtractionSummary::new();
        summary.days_total = days.len();

        tracing::info!(
            source = %self.source.describe(),
            date_from = %self.config.date_from,
            date_to = %self.config.date_to,
            days = days.len(),
            parallel_days = self.config.parallel_days,
            "Starting extraction"
        );

        let mut aggregator = Aggregator::new();
        let mut outcomes = stream::iter(days)
            .map(|day| self.process_day(day))
            .buffered(self.config.parallel_days.max(1));

        while let Some(outcome) = outcomes.next().await {
            if !outcome.started || outcome.interrupted {
                summary.interrupted = true;
            }
            if outcome.started {
                if outcome.listing_failed {
                    summary.days_failed += 1;
                } else {
                    summary.days_processed += 1;
                }
            }
            summary.orders_listed += outcome.orders_listed;
            summary.orders_fetched += outcome.orders_fetched;
            summary.orders_failed += outcome.orders_failed;
            summary.orders_skipped += outcome.orders_skipped;
            summary.items_seen += outcome.items_seen;
            for error in outcome.errors {
                summary.add_error(error);
            }
            aggregator.merge(outcome.aggregator);
        }

        summary.medication_items = aggregator.item_count();
        summary.output = aggregator.finish();

        if summary.interrupted {
            tracing::warn!(
                days_processed = summary.days_processed,
                days_total = summary.days_total,
                "Extraction interrupted by shutdown signal"
            );
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();

        Ok(summary)
    }

    fn is_shutdown_requested(&self) -> bool {
        *self.shutdown_signal.borrow()
    }

    /// Lists, fetches and folds the orders of one day
    async fn process_day(&self, date: NaiveDate) -> DayOutcome {
        let mut outcome = DayOutcome::default();
        if self.is_shutdown_requested() {
            return outcome;
        }
        outcome.started = true;

        tracing::info!(date = %date, "Processing day");

        let codes = match self.source.list_order_codes(date).await {
            Ok(codes) => codes,
            Err(e) => {
                tracing::error!(date = %date, error = %e, "Failed to list orders");
                outcome.listing_failed = true;
                outcome.errors.push(
                    ExtractionError::new(
                        ExtractionErrorType::Listing,
                        format!("Failed to list orders: {e}"),
                    )
                    .with_context(format!("date={date}")),
                );
                return outcome;
            }
        };
        outcome.orders_listed = codes.len();

        for code in codes {
            if self.is_shutdown_requested() {
                outcome.interrupted = true;
                break;
            }

            let order = match self.source.fetch_order(&code).await {
                Ok(order) => order,
                Err(e) => {
                    tracing::error!(date = %date, order_code = %code, error = %e, "Failed to fetch order");
                    outcome.orders_failed += 1;
                    outcome.errors.push(
                        ExtractionError::new(
                            ExtractionErrorType::Fetch,
                            format!("Failed to fetch order: {e}"),
                        )
                        .with_context(format!("date={date}, order_code={code}")),
                    );
                    continue;
                }
            };

            outcome.orders_fetched += 1;
            outcome.items_seen += order.items.len();

            let medications: Vec<LineItem> =
                order.items.into_iter().filter(|item| classify(item)).collect();

            if let Err(e) = outcome.aggregator.fold_order(&medications) {
                outcome.orders_skipped += 1;
                outcome.errors.push(
                    ExtractionError::new(ExtractionErrorType::Quantity, e.to_string())
                        .with_context(format!("date={date}, order_code={code}")),
                );
            }
        }

        crate::log_day_complete!(date, outcome.orders_fetched, outcome.aggregator.item_count());
        outcome
    }
}
