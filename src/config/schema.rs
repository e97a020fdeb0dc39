//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML file.

use crate::config::SecretString;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Official purchase-order endpoint of the Mercado Público API
pub const DEFAULT_BASE_URL: &str =
    "https://api.mercadopublico.cl/servicios/v1/publico/ordenesdecompra.json";

/// Main Medtally configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedTallyConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Procurement API settings
    #[serde(default)]
    pub mercadopublico: MercadoPublicoConfig,

    /// Extraction range and concurrency
    #[serde(default)]
    pub extract: ExtractConfig,

    /// CSV output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MedTallyConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.mercadopublico.validate()?;
        self.extract.validate()?;
        self.output.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 {
            return Err("mercadopublico.retry.max_retries must be > 0".to_string());
        }

        if self.backoff_multiplier < 1.0 {
            return Err("mercadopublico.retry.backoff_multiplier must be >= 1.0".to_string());
        }

        if self.initial_delay_ms > self.max_delay_ms {
            return Err(
                "mercadopublico.retry.initial_delay_ms cannot exceed max_delay_ms".to_string(),
            );
        }

        Ok(())
    }

    /// Backoff before the retry that follows failed attempt `attempt` (1-based)
    pub fn delay_for_attempt(&self, attempt: usize) -> u64 {
        let exponent = attempt.saturating_sub(1) as i32;
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        (delay as u64).min(self.max_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Mercado Público API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MercadoPublicoConfig {
    /// Purchase-order endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API ticket
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub ticket: Option<SecretString>,

    /// Order status filter for day listings
    #[serde(default = "default_order_status")]
    pub order_status: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Pause after every successful request, in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl MercadoPublicoConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err("mercadopublico.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("mercadopublico.base_url must start with http:// or https://".to_string());
        }

        if self
            .ticket
            .as_ref()
            .map(|t| t.expose_secret().is_blank())
            .unwrap_or(true)
        {
            return Err("mercadopublico.ticket cannot be empty".to_string());
        }

        if self.order_status.trim().is_empty() {
            return Err("mercadopublico.order_status cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("mercadopublico.timeout_seconds must be > 0".to_string());
        }

        self.retry.validate()
    }
}

impl Default for MercadoPublicoConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ticket: None,
            order_status: default_order_status(),
            timeout_seconds: default_timeout_seconds(),
            request_delay_ms: default_request_delay_ms(),
            retry: RetryConfig::default(),
        }
    }
}

/// Extraction range configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// First day of the range (inclusive)
    #[serde(default = "default_date_from")]
    pub date_from: NaiveDate,

    /// Last day of the range (inclusive)
    #[serde(default = "default_date_to")]
    pub date_to: NaiveDate,

    /// Number of days fetched concurrently
    #[serde(default = "default_parallel_days")]
    pub parallel_days: usize,
}

impl ExtractConfig {
    /// Validates the range and the concurrency bound
    ///
    /// # Errors
    ///
    /// Returns an error if `date_from` is after `date_to` or
    /// `parallel_days` is outside 1..=31
    pub fn validate(&self) -> Result<(), String> {
        if self.date_from > self.date_to {
            return Err(format!(
                "extract.date_from ({}) must not be after extract.date_to ({})",
                self.date_from, self.date_to
            ));
        }

        if self.parallel_days == 0 || self.parallel_days > 31 {
            return Err("extract.parallel_days must be between 1 and 31".to_string());
        }

        Ok(())
    }

    /// Every day of the range, in calendar order
    pub fn days(&self) -> Vec<NaiveDate> {
        self.date_from
            .iter_days()
            .take_while(|day| *day <= self.date_to)
            .collect()
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            date_from: default_date_from(),
            date_to: default_date_to(),
            parallel_days: default_parallel_days(),
        }
    }
}

/// CSV output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the CSV files are written to
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// Ranked summary file name
    #[serde(default = "default_summary_file")]
    pub summary_file: String,

    /// Raw item records file name
    #[serde(default = "default_raw_file")]
    pub raw_file: String,

    /// Rows of the console top-N table
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Skip writing CSV files
    #[serde(default)]
    pub dry_run: bool,
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.directory.is_empty() {
            return Err("output.directory cannot be empty".to_string());
        }

        if self.summary_file.is_empty() || self.raw_file.is_empty() {
            return Err("output.summary_file and output.raw_file cannot be empty".to_string());
        }

        if self.summary_file == self.raw_file {
            return Err("output.summary_file and output.raw_file must differ".to_string());
        }

        if self.top_n == 0 {
            return Err("output.top_n must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            summary_file: default_summary_file(),
            raw_file: default_raw_file(),
            top_n: default_top_n(),
            dry_run: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_order_status() -> String {
    "aceptada".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_request_delay_ms() -> u64 {
    250
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_date_from() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 1).unwrap_or(NaiveDate::MIN)
}

fn default_date_to() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 31).unwrap_or(NaiveDate::MIN)
}

fn default_parallel_days() -> usize {
    1
}

fn default_output_directory() -> String {
    ".".to_string()
}

fn default_summary_file() -> String {
    "resumen_top_medicamentos.csv".to_string()
}

fn default_raw_file() -> String {
    "items_medicamentos_raw.csv".to_string()
}

fn default_top_n() -> usize {
    20
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn valid_config() -> MedTallyConfig {
        let mut config = MedTallyConfig::default();
        config.mercadopublico.ticket = Some(secret_string("ABCD-1234".to_string()));
        config
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_config_with_ticket_is_valid() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ticket_required() {
        let mut config = valid_config();
        config.mercadopublico.ticket = None;
        let err = config.validate().unwrap_err();
        assert!(err.contains("ticket"));

        config.mercadopublico.ticket = Some(secret_string("   ".to_string()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url_validation() {
        let mut config = valid_config();
        config.mercadopublico.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.mercadopublico.base_url = String::new();
        assert!(config.validate().is_err());

        config.mercadopublico.base_url = "http://localhost:1234/ordenes".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_retry_validation() {
        let mut config = valid_config();
        config.mercadopublico.retry.max_retries = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.mercadopublico.retry.backoff_multiplier = 0.5;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.mercadopublico.retry.initial_delay_ms = 60_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_delay_growth() {
        let retry = RetryConfig {
            max_retries: 5,
            initial_delay_ms: 100,
            max_delay_ms: 350,
            backoff_multiplier: 2.0,
        };
        assert_eq!(retry.delay_for_attempt(1), 100);
        assert_eq!(retry.delay_for_attempt(2), 200);
        assert_eq!(retry.delay_for_attempt(3), 350);
        assert_eq!(retry.delay_for_attempt(10), 350);
    }

    #[test]
    fn test_extract_range_validation() {
        let mut config = ExtractConfig {
            date_from: date(2024, 7, 10),
            date_to: date(2024, 7, 1),
            parallel_days: 1,
        };
        assert!(config.validate().is_err());

        config.date_to = date(2024, 7, 10);
        assert!(config.validate().is_ok());

        config.parallel_days = 0;
        assert!(config.validate().is_err());

        config.parallel_days = 32;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_extract_days_inclusive() {
        let config = ExtractConfig {
            date_from: date(2024, 2, 27),
            date_to: date(2024, 3, 1),
            parallel_days: 1,
        };
        assert_eq!(
            config.days(),
            vec![
                date(2024, 2, 27),
                date(2024, 2, 28),
                date(2024, 2, 29),
                date(2024, 3, 1)
            ]
        );

        let single = ExtractConfig {
            date_from: date(2024, 7, 1),
            date_to: date(2024, 7, 1),
            parallel_days: 1,
        };
        assert_eq!(single.days().len(), 1);
    }

    #[test]
    fn test_default_range() {
        let config = ExtractConfig::default();
        assert_eq!(config.date_from, date(2024, 7, 1));
        assert_eq!(config.days().len(), 31);
    }

    #[test]
    fn test_output_validation() {
        let mut config = valid_config();
        config.output.top_n = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.output.raw_file = config.output.summary_file.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_rotation_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "hourly".to_string();
        assert!(config.validate().is_ok());

        config.local_rotation = "size".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: MedTallyConfig = toml::from_str(
            r#"
[mercadopublico]
ticket = "ABCD-1234"

[extract]
date_from = "2024-07-01"
date_to = "2024-07-03"
"#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.mercadopublico.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.mercadopublico.order_status, "aceptada");
        assert_eq!(config.mercadopublico.request_delay_ms, 250);
        assert_eq!(config.mercadopublico.timeout_seconds, 60);
        assert_eq!(config.extract.days().len(), 3);
        assert_eq!(config.output.summary_file, "resumen_top_medicamentos.csv");
        assert_eq!(config.output.raw_file, "items_medicamentos_raw.csv");
        assert_eq!(config.output.top_n, 20);
        assert!(!config.logging.local_enabled);
    }

    #[test]
    fn test_ticket_not_in_debug_output() {
        let config = valid_config();
        let debug = format!("{config:?}");
        assert!(!debug.contains("ABCD-1234"));
    }
}
