//! Order source trait
//!
//! This module defines the `OrderSource` trait that abstracts where purchase
//! orders come from. The extraction coordinator only talks to this trait; the
//! Mercado Público REST client is one implementation, tests provide in-memory
//! ones.

use crate::domain::{OrderCode, PurchaseOrder, Result};
use async_trait::async_trait;
use chrono::NaiveDate;

/// A paginated source of purchase orders
///
/// # Example
///
/// ```no_run
/// use medtally::adapters::mercadopublico::MercadoPublicoClient;
/// use medtally::adapters::OrderSource;
/// use medtally::config::MercadoPublicoConfig;
/// use chrono::NaiveDate;
///
/// # async fn example() -> medtally::domain::Result<()> {
/// let client = MercadoPublicoClient::new(MercadoPublicoConfig::default())?;
///
/// let day = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
/// for code in client.list_order_codes(day).await? {
///     let order = client.fetch_order(&code).await?;
///     println!("{} has {} items", order.code, order.items.len());
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// List the codes of the orders issued on a date
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    async fn list_order_codes(&self, date: NaiveDate) -> Result<Vec<OrderCode>>;

    /// Fetch an order with its line items
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    async fn fetch_order(&self, code: &OrderCode) -> Result<PurchaseOrder>;

    /// Human readable location of the source, for logs
    fn describe(&self) -> String;
}
