//! Mercado Público procurement API adapter
//!
//! Implements [`OrderSource`](crate::adapters::OrderSource) over the public
//! purchase-order REST endpoint.

pub mod client;
pub mod models;

pub use client::MercadoPublicoClient;
pub use models::{ListingResponse, OrderDetail};
