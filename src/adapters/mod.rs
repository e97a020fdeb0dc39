//! External system integrations for Medtally.
//!
//! - [`source`] - the [`OrderSource`] trait the extraction coordinator reads from
//! - [`mercadopublico`] - Mercado Público REST implementation of [`OrderSource`]
//! - [`csv`] - summary and audit CSV files
//!
//! Adapters isolate external dependencies so the core can be tested with
//! in-memory sources.

pub mod csv;
pub mod mercadopublico;
pub mod source;

pub use source::OrderSource;
