//! Configuration management for Medtally.
//!
//! Medtally reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `MEDTALLY_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Per-section validation
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use medtally::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("medtally.toml")?;
//!
//! println!("API: {}", config.mercadopublico.base_url);
//! println!("Range: {} .. {}", config.extract.date_from, config.extract.date_to);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`MercadoPublicoConfig`] - endpoint, ticket, status filter, pacing and [`RetryConfig`]
//! - [`ExtractConfig`] - date range and day concurrency
//! - [`OutputConfig`] - CSV directory, file names and top-N size
//! - [`LoggingConfig`] - local rolling log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [mercadopublico]
//! ticket = "${MERCADOPUBLICO_TICKET}"
//! order_status = "aceptada"
//! request_delay_ms = 250
//!
//! [extract]
//! date_from = "2024-07-01"
//! date_to = "2024-07-31"
//!
//! [output]
//! directory = "output"
//! top_n = 20
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config_file};
pub use schema::{
    ApplicationConfig, ExtractConfig, LoggingConfig, MedTallyConfig, MercadoPublicoConfig,
    OutputConfig, RetryConfig, DEFAULT_BASE_URL,
};
pub use secret::{secret_string, SecretString, SecretValue};
