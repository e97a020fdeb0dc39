//! Core business logic for Medtally.
//!
//! # Modules
//!
//! - [`medication`] - text normalization, classification, key derivation and quantity coercion
//! - [`aggregate`] - per-key quantity totals and ranking
//! - [`extract`] - date-range orchestration over an order source
//!
//! `medication` and `aggregate` are synchronous and never touch the network;
//! `extract` is the async layer that feeds them.
//!
//! # Example
//!
//! ```rust,no_run
//! use medtally::adapters::mercadopublico::MercadoPublicoClient;
//! use medtally::config::load_config;
//! use medtally::core::extract::ExtractionCoordinator;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("medtally.toml")?;
//! let source = Arc::new(MercadoPublicoClient::new(config.mercadopublico.clone())?);
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let coordinator = ExtractionCoordinator::new(config.extract.clone(), source, shutdown_rx);
//!
//! let summary = coordinator.execute_extraction().await?;
//! for entry in summary.output.top(20) {
//!     println!("{} {}", entry.med_key, entry.total_quantity);
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod extract;
pub mod medication;
