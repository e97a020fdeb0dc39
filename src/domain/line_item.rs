//! Purchase-order line item domain model
//!
//! Line items are what the procurement API calls "Items" inside an order
//! detail. The API is loosely typed: a category code or a quantity may come
//! back as a JSON number on one order and as a string on the next, so those
//! fields are kept as [`LooseValue`] until the core coerces them.

use super::ids::OrderCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar JSON value whose type the source does not guarantee
///
/// # Examples
///
/// ```
/// use medtally::domain::LooseValue;
///
/// let qty: LooseValue = serde_json::from_str("\"1,5\"").unwrap();
/// assert_eq!(qty.to_text(), "1,5");
///
/// let code: LooseValue = serde_json::from_str("51101500").unwrap();
/// assert_eq!(code.to_text(), "51101500");
/// assert!(!code.is_falsy());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseValue {
    /// JSON boolean
    Flag(bool),
    /// JSON number, rendered the way JSON renders it
    Number(serde_json::Number),
    /// JSON string
    Text(String),
}

impl LooseValue {
    /// Textual rendering of the value
    ///
    /// Booleans render as `True` / `False`.
    pub fn to_text(&self) -> String {
        match self {
            LooseValue::Flag(true) => "True".to_string(),
            LooseValue::Flag(false) => "False".to_string(),
            LooseValue::Number(n) => n.to_string(),
            LooseValue::Text(s) => s.clone(),
        }
    }

    /// Empty text, numeric zero and `false` are falsy
    pub fn is_falsy(&self) -> bool {
        match self {
            LooseValue::Flag(b) => !b,
            LooseValue::Number(n) => n.as_f64().map(|v| v == 0.0).unwrap_or(false),
            LooseValue::Text(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for LooseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl From<&str> for LooseValue {
    fn from(s: &str) -> Self {
        LooseValue::Text(s.to_string())
    }
}

impl From<String> for LooseValue {
    fn from(s: String) -> Self {
        LooseValue::Text(s)
    }
}

impl From<i32> for LooseValue {
    fn from(n: i32) -> Self {
        LooseValue::Number(n.into())
    }
}

impl From<i64> for LooseValue {
    fn from(n: i64) -> Self {
        LooseValue::Number(n.into())
    }
}

impl From<f64> for LooseValue {
    /// Non-finite floats have no JSON form and become `Text`.
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n)
            .map(LooseValue::Number)
            .unwrap_or_else(|| LooseValue::Text(n.to_string()))
    }
}

/// A single purchase-order line item
///
/// Carries the metadata of its order alongside the item fields so that it
/// can be classified, keyed and audited on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Code of the order this item belongs to
    pub order_code: OrderCode,

    /// Order date as sent by the source (not validated)
    pub order_date: String,

    /// Buying organism
    pub buyer_name: String,

    /// Supplier
    pub supplier_name: String,

    /// Category code, classification input
    pub category_code: Option<LooseValue>,

    /// Supplier specification text
    pub supplier_spec: Option<String>,

    /// Buyer specification text
    pub buyer_spec: Option<String>,

    /// Product name text
    pub product_name: Option<String>,

    /// Product text
    pub product: Option<String>,

    /// Purchased quantity, possibly locale formatted
    pub quantity: Option<LooseValue>,

    /// Unit of purchase
    pub unit: String,

    /// Net price, passed through untouched
    pub net_price: String,
}

impl LineItem {
    /// Creates a new builder for constructing a LineItem
    pub fn builder() -> LineItemBuilder {
        LineItemBuilder::default()
    }

    /// Description fields in key-derivation order: supplier spec, buyer spec,
    /// product name, product
    pub fn description_fields(&self) -> [Option<&str>; 4] {
        [
            self.supplier_spec.as_deref(),
            self.buyer_spec.as_deref(),
            self.product_name.as_deref(),
            self.product.as_deref(),
        ]
    }
}

/// Builder for constructing LineItem instances
#[derive(Debug, Default)]
pub struct LineItemBuilder {
    order_code: Option<OrderCode>,
    order_date: String,
    buyer_name: String,
    supplier_name: String,
    category_code: Option<LooseValue>,
    supplier_spec: Option<String>,
    buyer_spec: Option<String>,
    product_name: Option<String>,
    product: Option<String>,
    quantity: Option<LooseValue>,
    unit: String,
    net_price: String,
}

impl LineItemBuilder {
    /// Creates a new LineItemBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the order code
    pub fn order_code(mut self, code: impl Into<String>) -> Result<Self, String> {
        self.order_code = Some(OrderCode::new(code)?);
        Ok(self)
    }

    /// Sets the order date text
    pub fn order_date(mut self, date: impl Into<String>) -> Self {
        self.order_date = date.into();
        self
    }

    /// Sets the buyer name
    pub fn buyer_name(mut self, name: impl Into<String>) -> Self {
        self.buyer_name = name.into();
        self
    }

    /// Sets the supplier name
    pub fn supplier_name(mut self, name: impl Into<String>) -> Self {
        self.supplier_name = name.into();
        self
    }

    /// Sets the category code
    pub fn category_code(mut self, code: impl Into<LooseValue>) -> Self {
        self.category_code = Some(code.into());
        self
    }

    /// Sets the supplier specification
    pub fn supplier_spec(mut self, text: impl Into<String>) -> Self {
        self.supplier_spec = Some(text.into());
        self
    }

    /// Sets the buyer specification
    pub fn buyer_spec(mut self, text: impl Into<String>) -> Self {
        self.buyer_spec = Some(text.into());
        self
    }

    /// Sets the product name
    pub fn product_name(mut self, text: impl Into<String>) -> Self {
        self.product_name = Some(text.into());
        self
    }

    /// Sets the product
    pub fn product(mut self, text: impl Into<String>) -> Self {
        self.product = Some(text.into());
        self
    }

    /// Sets the quantity
    pub fn quantity(mut self, quantity: impl Into<LooseValue>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }

    /// Sets the unit
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Sets the net price
    pub fn net_price(mut self, price: impl Into<String>) -> Self {
        self.net_price = price.into();
        self
    }

    /// Builds the LineItem
    ///
    /// # Errors
    ///
    /// Returns an error if the order code is missing
    pub fn build(self) -> Result<LineItem, String> {
        Ok(LineItem {
            order_code: self.order_code.ok_or("order_code is required")?,
            order_date: self.order_date,
            buyer_name: self.buyer_name,
            supplier_name: self.supplier_name,
            category_code: self.category_code,
            supplier_spec: self.supplier_spec,
            buyer_spec: self.buyer_spec,
            product_name: self.product_name,
            product: self.product,
            quantity: self.quantity,
            unit: self.unit,
            net_price: self.net_price,
        })
    }
}

/// A purchase order with its line items, as returned by an order source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Order code
    pub code: OrderCode,

    /// Order date text
    pub date: String,

    /// Buying organism
    pub buyer_name: String,

    /// Supplier
    pub supplier_name: String,

    /// Line items, each already carrying the order metadata above
    pub items: Vec<LineItem>,
}

impl PurchaseOrder {
    /// Creates an order without items
    pub fn new(code: OrderCode) -> Self {
        Self {
            code,
            date: String::new(),
            buyer_name: String::new(),
            supplier_name: String::new(),
            items: Vec::new(),
        }
    }
}
