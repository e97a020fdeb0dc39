// Medtally - Medication purchase totals from Mercado Público
// Copyright (c) 2025 Medtally Contributors
// Licensed under the MIT License

//! # Medtally - Medication purchase totals from Mercado Público
//!
//! Medtally pulls the purchase orders issued on Chile's public procurement
//! platform over a date range, keeps the line items whose category code
//! marks them as medications, and ranks each drug by total purchased
//! quantity.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Extracting** order codes per day and order details from the Mercado Público REST API
//! - **Classifying** line items by their UNSPSC category prefix
//! - **Keying** free-text descriptions to a "generic + strength + unit" medication key
//! - **Aggregating** quantities per key, ranked highest first
//! - **Writing** a ranked summary CSV and a per-item audit CSV
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (medication heuristics, aggregation, extraction)
//! - [`adapters`] - External integrations (Mercado Público API, CSV files)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use medtally::core::aggregate::aggregate;
//! use medtally::domain::LineItem;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let items = vec![
//!     LineItem::builder()
//!         .order_code("1057-123-SE24")?
//!         .category_code("51101500")
//!         .supplier_spec("Paracetamol 500 mg comprimidos")
//!         .quantity("10")
//!         .build()?,
//!     LineItem::builder()
//!         .order_code("1057-124-SE24")?
//!         .category_code("51101500")
//!         .buyer_spec("PARACETAMOL 500MG")
//!         .quantity(20)
//!         .build()?,
//! ];
//!
//! let output = aggregate(&items);
//! assert_eq!(output.ranked[0].med_key, "PARACETAMOL 500 MG");
//! assert_eq!(output.ranked[0].total_quantity, 30.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`], backed by
//! [`domain::MedTallyError`]. Quantity parse failures are reported per order
//! and never abort a run.
//!
//! ## Logging
//!
//! Logging uses the `tracing` crate. The API ticket is never written to logs.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
