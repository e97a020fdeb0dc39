//! Extract command implementation
//!
//! This module implements the `extract` command: fetch the orders of a date
//! range, rank medications by purchased quantity, write the CSV files and
//! print the top-N table.

use crate::adapters::csv::write_outputs;
use crate::adapters::mercadopublico::MercadoPublicoClient;
use crate::adapters::OrderSource;
use crate::config::{parse_config_file, MedTallyConfig};
use crate::core::aggregate::RankedEntry;
use crate::core::extract::{ExtractionCoordinator, ExtractionSummary};
use crate::domain::MedTallyError;
use chrono::NaiveDate;
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Errors listed on the console before the rest are elided
const MAX_ERRORS_SHOWN: usize = 10;

/// Arguments for the extract command
#[derive(Args, Debug, Default)]
pub struct ExtractArgs {
    /// First day of the range (YYYY-MM-DD), overrides extract.date_from
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub from: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD), overrides extract.date_to
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub to: Option<NaiveDate>,

    /// Directory for the CSV files, overrides output.directory
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Rows of the top-N table, overrides output.top_n
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Days fetched concurrently, overrides extract.parallel_days
    #[arg(long, value_name = "N")]
    pub parallel_days: Option<usize>,

    /// Run the extraction without writing CSV files
    #[arg(long)]
    pub dry_run: bool,
}

impl ExtractArgs {
    /// Execute the extract command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting extract command");

        let mut config = match parse_config_file(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };
        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("❌ Configuration validation failed: {e}");
            return Ok(2);
        }

        let source = match MercadoPublicoClient::new(config.mercadopublico.clone()) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create API client");
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        self.run(config, source, shutdown_signal).await
    }

    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut MedTallyConfig) {
        if let Some(from) = self.from {
            tracing::info!(date_from = %from, "Overriding date_from from CLI");
            config.extract.date_from = from;
        }
        if let Some(to) = self.to {
            tracing::info!(date_to = %to, "Overriding date_to from CLI");
            config.extract.date_to = to;
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(top) = self.top {
            config.output.top_n = top;
        }
        if let Some(parallel_days) = self.parallel_days {
            config.extract.parallel_days = parallel_days;
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.output.dry_run = true;
        }
    }

    /// Run the extraction against an order source and report the result
    ///
    /// `config` must already be validated.
    pub async fn run(
        &self,
        config: MedTallyConfig,
        source: Arc<dyn OrderSource>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        if config.output.dry_run {
            println!("🔍 DRY RUN MODE - No CSV files will be written");
            println!();
        }

        println!(
            "🚀 Extracting orders from {} to {} ({})",
            config.extract.date_from,
            config.extract.date_to,
            source.describe()
        );
        println!();

        let coordinator = ExtractionCoordinator::new(config.extract.clone(), source, shutdown_signal);
        let summary = match coordinator.execute_extraction().await {
            Ok(s) => s,
            Err(MedTallyError::Configuration(e)) => {
                eprintln!("❌ Configuration error: {e}");
                return Ok(2);
            }
            Err(e) => {
                tracing::error!(error = %e, "Extraction failed");
                eprintln!("❌ Extraction failed: {e}");
                return Ok(5);
            }
        };

        print_summary(&summary);

        if summary.output.is_empty() {
            println!("⚠️  No medication items found in the range");
            return Ok(if summary.interrupted { 130 } else { 3 });
        }

        if !config.output.dry_run {
            match write_outputs(&config.output, &summary.output) {
                Ok(paths) => {
                    println!("💾 Summary written to {}", paths.summary.display());
                    println!("💾 Items written to {}", paths.records.display());
                    println!();
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to write CSV output");
                    eprintln!("❌ Failed to write CSV output: {e}");
                    return Ok(5);
                }
            }
        }

        println!("🏆 Top {} medications by quantity:", config.output.top_n);
        println!();
        print!("{}", format_top_table(summary.output.top(config.output.top_n)));
        println!();

        let exit_code = if summary.interrupted {
            println!("⚠️  Extraction interrupted. Results cover the days completed so far.");
            130
        } else if summary.is_successful() {
            println!("✅ Extraction completed successfully!");
            0
        } else {
            println!("⚠️  Extraction completed with fetch errors");
            1
        };

        Ok(exit_code)
    }
}

fn print_summary(summary: &ExtractionSummary) {
    println!("📊 Extraction Summary:");
    println!(
        "  Days: {} of {} ({} failed)",
        summary.days_processed, summary.days_total, summary.days_failed
    );
    println!("  Orders Listed: {}", summary.orders_listed);
    println!("  Orders Fetched: {}", summary.orders_fetched);
    println!("  Orders Failed: {}", summary.orders_failed);
    println!("  Orders Skipped (bad quantity): {}", summary.orders_skipped);
    println!("  Items Seen: {}", summary.items_seen);
    println!("  Medication Items: {}", summary.medication_items);
    println!("  Medication Keys: {}", summary.output.ranked.len());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if !summary.errors.is_empty() {
        println!("⚠️  Errors encountered:");
        for error in summary.errors.iter().take(MAX_ERRORS_SHOWN) {
            println!("  - {:?}: {}", error.error_type, error.message);
            if let Some(context) = &error.context {
                println!("    Context: {context}");
            }
        }
        if summary.errors.len() > MAX_ERRORS_SHOWN {
            println!(
                "  ... and {} more errors",
                summary.errors.len() - MAX_ERRORS_SHOWN
            );
        }
        println!();
    }
}

/// Renders ranked entries as a two-column text table
///
/// Keys are left-aligned, quantities right-aligned.
pub fn format_top_table(entries: &[RankedEntry]) -> String {
    let quantities: Vec<String> = entries
        .iter()
        .map(|e| format!("{:?}", e.total_quantity))
        .collect();

    let key_width = entries
        .iter()
        .map(|e| e.med_key.chars().count())
        .chain(std::iter::once("med_key".len()))
        .max()
        .unwrap_or(0);
    let qty_width = quantities
        .iter()
        .map(String::len)
        .chain(std::iter::once("cantidad".len()))
        .max()
        .unwrap_or(0);

    let mut table = format!("{:<key_width$}  {:>qty_width$}\n", "med_key", "cantidad");
    for (entry, quantity) in entries.iter().zip(&quantities) {
        let padding = key_width - entry.med_key.chars().count();
        table.push_str(&format!(
            "{}{}  {:>qty_width$}\n",
            entry.med_key,
            " ".repeat(padding),
            quantity
        ));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineItem, OrderCode, PurchaseOrder, Result};
    use async_trait::async_trait;
    use tempfile::TempDir;

    /// One order on every day, with the given category code
    struct DailyOrderSource {
        category: &'static str,
    }

    #[async_trait]
    impl OrderSource for DailyOrderSource {
        async fn list_order_codes(&self, date: NaiveDate) -> Result<Vec<OrderCode>> {
            Ok(vec![OrderCode::new(format!("{}-1-SE24", date.format("%d")))
                .map_err(MedTallyError::Validation)?])
        }

        async fn fetch_order(&self, code: &OrderCode) -> Result<PurchaseOrder> {
            let item = LineItem::builder()
                .order_code(code.as_str())
                .map_err(MedTallyError::Validation)?
                .category_code(self.category)
                .supplier_spec("Paracetamol 500 mg")
                .quantity("10")
                .build()
                .map_err(MedTallyError::Validation)?;
            let mut order = PurchaseOrder::new(code.clone());
            order.items.push(item);
            Ok(order)
        }

        fn describe(&self) -> String {
            "daily".to_string()
        }
    }

    fn two_day_config(dir: &TempDir) -> MedTallyConfig {
        let mut config = MedTallyConfig::default();
        config.extract.date_from = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        config.extract.date_to = NaiveDate::from_ymd_opt(2024, 7, 2).unwrap();
        config.output.directory = dir.path().to_string_lossy().to_string();
        config
    }

    #[tokio::test]
    async fn test_run_writes_outputs() {
        let dir = TempDir::new().unwrap();
        let (_tx, rx) = watch::channel(false);
        let source = Arc::new(DailyOrderSource { category: "51101500" });

        let code = ExtractArgs::default()
            .run(two_day_config(&dir), source, rx)
            .await
            .unwrap();

        assert_eq!(code, 0);
        assert!(dir.path().join("resumen_top_medicamentos.csv").exists());
        assert!(dir.path().join("items_medicamentos_raw.csv").exists());
    }

    #[tokio::test]
    async fn test_run_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut config = two_day_config(&dir);
        config.output.dry_run = true;
        let (_tx, rx) = watch::channel(false);
        let source = Arc::new(DailyOrderSource { category: "51101500" });

        let code = ExtractArgs::default().run(config, source, rx).await.unwrap();

        assert_eq!(code, 0);
        assert!(!dir.path().join("resumen_top_medicamentos.csv").exists());
    }

    #[tokio::test]
    async fn test_run_without_medications() {
        let dir = TempDir::new().unwrap();
        let (_tx, rx) = watch::channel(false);
        let source = Arc::new(DailyOrderSource { category: "42131600" });

        let code = ExtractArgs::default()
            .run(two_day_config(&dir), source, rx)
            .await
            .unwrap();

        assert_eq!(code, 3);
        assert!(!dir.path().join("resumen_top_medicamentos.csv").exists());
    }

    #[tokio::test]
    async fn test_run_interrupted_before_start() {
        let dir = TempDir::new().unwrap();
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let source = Arc::new(DailyOrderSource { category: "51101500" });

        let code = ExtractArgs::default()
            .run(two_day_config(&dir), source, rx)
            .await
            .unwrap();

        assert_eq!(code, 130);
    }

    #[test]
    fn test_extract_args_defaults() {
        let args = ExtractArgs::default();
        assert!(args.from.is_none());
        assert!(args.top.is_none());
        assert!(!args.dry_run);
    }

    #[test]
    fn test_apply_overrides() {
        let args = ExtractArgs {
            from: NaiveDate::from_ymd_opt(2024, 8, 1),
            to: NaiveDate::from_ymd_opt(2024, 8, 2),
            output_dir: Some("salida".to_string()),
            top: Some(5),
            parallel_days: Some(2),
            dry_run: true,
        };
        let mut config = MedTallyConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.extract.days().len(), 2);
        assert_eq!(config.extract.parallel_days, 2);
        assert_eq!(config.output.directory, "salida");
        assert_eq!(config.output.top_n, 5);
        assert!(config.output.dry_run);
    }

    #[test]
    fn test_overrides_keep_config_when_absent() {
        let mut config = MedTallyConfig::default();
        config.output.top_n = 7;
        ExtractArgs::default().apply_overrides(&mut config);
        assert_eq!(config.output.top_n, 7);
        assert!(!config.output.dry_run);
    }

    #[test]
    fn test_format_top_table() {
        let table = format_top_table(&[
            RankedEntry::new("PARACETAMOL 500 MG", 120.0),
            RankedEntry::new("SUERO", 7.5),
        ]);

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "med_key             cantidad");
        assert_eq!(lines[1], "PARACETAMOL 500 MG     120.0");
        assert_eq!(lines[2], "SUERO                    7.5");
    }

    #[test]
    fn test_format_top_table_accents() {
        let table = format_top_table(&[RankedEntry::new("ÁCIDO FÓLICO 1 MG", 3.0)]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0].chars().count(), lines[1].chars().count());
    }
}
