//! Mercado Público REST client
//!
//! Every call is a `GET` on the purchase-order endpoint with the account
//! ticket as a query parameter. Transient failures (connection errors,
//! timeouts, 429 and 5xx) are retried with exponential backoff; after every
//! successful call the client pauses for `request_delay_ms` to stay under the
//! API's rate limit.

use super::models::{unwrap_detail, ListingResponse, OrderDetail};
use crate::adapters::source::OrderSource;
use crate::config::MercadoPublicoConfig;
use crate::domain::{MedTallyError, OrderCode, PurchaseOrder, Result, SourceError};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;

/// Longest response body excerpt kept in error messages
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Mercado Público purchase-order client
///
/// # Example
///
/// ```no_run
/// use medtally::adapters::mercadopublico::MercadoPublicoClient;
/// use medtally::adapters::OrderSource;
/// use medtally::config::{secret_string, MercadoPublicoConfig};
///
/// # async fn example() -> medtally::domain::Result<()> {
/// let config = MercadoPublicoConfig {
///     ticket: Some(secret_string("YOUR-TICKET".to_string())),
///     ..Default::default()
/// };
/// let client = MercadoPublicoClient::new(config)?;
///
/// let code = "1057-123-SE24".parse().unwrap();
/// let order = client.fetch_order(&code).await?;
/// println!("{} items", order.items.len());
/// # Ok(())
/// # }
/// ```
pub struct MercadoPublicoClient {
    /// Purchase-order endpoint
    base_url: String,

    /// HTTP client for making requests
    client: Client,

    /// API configuration
    config: MercadoPublicoConfig,
}

impl MercadoPublicoClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: MercadoPublicoConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                MedTallyError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: config.base_url.clone(),
            client,
            config,
        })
    }

    /// Purchase-order endpoint this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn ticket(&self) -> Result<&str> {
        self.config
            .ticket
            .as_ref()
            .map(|t| t.expose_secret().as_ref())
            .ok_or_else(|| {
                MedTallyError::Configuration("mercadopublico.ticket is not set".to_string())
            })
    }

    /// Retry a request with exponential backoff
    ///
    /// Only retryable source errors are retried; everything else fails fast.
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_retries = self.config.retry.max_retries;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    let retryable = matches!(&e, MedTallyError::Source(s) if s.is_retryable());
                    if !retryable || attempt >= max_retries {
                        return Err(e);
                    }

                    let delay_ms = self.config.retry.delay_for_attempt(attempt);
                    crate::log_retry_attempt!(attempt, max_retries, delay_ms, &e);

                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    /// One `GET` on the endpoint, decoded as JSON
    async fn get_json(&self, query: &[(&str, &str)]) -> Result<Value> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body).into());
        }

        resp.json::<Value>().await.map_err(|e| {
            SourceError::InvalidResponse(format!("Response is not JSON: {}", e.without_url()))
                .into()
        })
    }

    async fn pause(&self) {
        if self.config.request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;
        }
    }
}

fn transport_error(e: reqwest::Error) -> MedTallyError {
    let timed_out = e.is_timeout();
    // the request URL carries the ticket
    let e = e.without_url();
    if timed_out {
        SourceError::Timeout(e.to_string()).into()
    } else {
        SourceError::ConnectionFailed(e.to_string()).into()
    }
}

fn status_error(status: StatusCode, body: &str) -> SourceError {
    let excerpt: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    let message = format!("HTTP {status}: {excerpt}");

    match status {
        StatusCode::TOO_MANY_REQUESTS => SourceError::RateLimitExceeded(message),
        s if s.is_server_error() => SourceError::ServerError {
            status: s.as_u16(),
            message,
        },
        s if s.is_client_error() => SourceError::ClientError {
            status: s.as_u16(),
            message,
        },
        _ => SourceError::InvalidResponse(message),
    }
}

#[async_trait]
impl OrderSource for MercadoPublicoClient {
    async fn list_order_codes(&self, date: NaiveDate) -> Result<Vec<OrderCode>> {
        let ticket = self.ticket()?;
        let fecha = date.format("%d%m%Y").to_string();
        let query = [
            ("fecha", fecha.as_str()),
            ("ticket", ticket),
            ("estado", self.config.order_status.as_str()),
        ];

        tracing::debug!(date = %date, estado = %self.config.order_status, "Listing orders");

        let body = self.retry_request(|| self.get_json(&query)).await?;
        self.pause().await;

        let listing: ListingResponse = serde_json::from_value(body).map_err(|e| {
            SourceError::InvalidResponse(format!("Malformed listing for {date}: {e}"))
        })?;
        let codes = listing.order_codes();

        tracing::debug!(date = %date, count = codes.len(), "Listed orders");
        Ok(codes)
    }

    async fn fetch_order(&self, code: &OrderCode) -> Result<PurchaseOrder> {
        let ticket = self.ticket()?;
        let query = [("codigo", code.as_str()), ("ticket", ticket)];

        tracing::debug!(order_code = %code, "Fetching order");

        let body = self.retry_request(|| self.get_json(&query)).await?;
        self.pause().await;

        let order = unwrap_detail(body);
        if !order.is_object() {
            return Err(SourceError::InvalidResponse(format!(
                "Order {code} detail is not an object"
            ))
            .into());
        }

        let detail: OrderDetail = serde_json::from_value(order).map_err(|e| {
            SourceError::InvalidResponse(format!("Malformed detail for order {code}: {e}"))
        })?;

        Ok(detail.into_purchase_order(code.clone()))
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
