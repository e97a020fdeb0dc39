//! Aggregation output types

use crate::core::medication::{coerce_quantity, derive_key};
use crate::domain::{LineItem, LooseValue, OrderCode, QuantityFormatError};
use serde::{Deserialize, Serialize};

/// Per-item audit record, one per folded line item
///
/// Serializes as one row of the audit CSV; field order is column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Order code
    #[serde(rename = "codigo_oc")]
    pub order_code: OrderCode,

    /// Order date text
    #[serde(rename = "fecha_oc")]
    pub order_date: String,

    /// Buying organism
    #[serde(rename = "organismo")]
    pub buyer_name: String,

    /// Supplier
    #[serde(rename = "proveedor")]
    pub supplier_name: String,

    /// Derived medication key
    pub med_key: String,

    /// Coerced quantity
    #[serde(rename = "cantidad")]
    pub quantity: f64,

    /// Unit of purchase
    #[serde(rename = "unidad")]
    pub unit: String,

    /// Net price passthrough
    #[serde(rename = "precio_neto")]
    pub net_price: String,
}

impl ItemRecord {
    /// Derives the key and coerces the quantity of a line item
    ///
    /// # Errors
    ///
    /// Returns the [`QuantityFormatError`] of an unparseable or negative
    /// quantity. Totals only ever grow, so `"-3"` is rejected like `"N/A"`.
    pub fn from_item(item: &LineItem) -> Result<Self, QuantityFormatError> {
        let quantity = coerce_quantity(item.quantity.as_ref())?;
        if quantity < 0.0 {
            let raw = item
                .quantity
                .as_ref()
                .map(LooseValue::to_text)
                .unwrap_or_default();
            return Err(QuantityFormatError::new(raw));
        }
        Ok(Self {
            order_code: item.order_code.clone(),
            order_date: item.order_date.clone(),
            buyer_name: item.buyer_name.clone(),
            supplier_name: item.supplier_name.clone(),
            med_key: derive_key(item),
            quantity,
            unit: item.unit.clone(),
            net_price: item.net_price.clone(),
        })
    }
}

/// A medication key with its cumulative quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// Medication key
    pub med_key: String,

    /// Sum of the quantities of every contributing item
    #[serde(rename = "cantidad")]
    pub total_quantity: f64,
}

impl RankedEntry {
    /// Creates a new ranked entry
    pub fn new(med_key: impl Into<String>, total_quantity: f64) -> Self {
        Self {
            med_key: med_key.into(),
            total_quantity,
        }
    }
}

/// An order left out of the aggregate because one of its items had an
/// unparseable quantity
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedOrder {
    /// Order code
    pub order_code: OrderCode,

    /// First quantity error found in the order
    pub error: QuantityFormatError,
}

/// Final aggregation output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateOutput {
    /// Keys by descending total quantity; ties keep first-appearance order
    pub ranked: Vec<RankedEntry>,

    /// Every folded item, in consumption order
    pub records: Vec<ItemRecord>,

    /// Orders skipped because of quantity errors
    pub skipped_orders: Vec<SkippedOrder>,
}

impl AggregateOutput {
    /// True when no item was folded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The first `n` ranked entries
    pub fn top(&self, n: usize) -> &[RankedEntry] {
        &self.ranked[..n.min(self.ranked.len())]
    }
}
