//! Aggregation pipeline
//!
//! Folds medication line items into per-key quantity totals.
//!
//! # Quantity errors
//!
//! The unit of atomicity is the order: if any item of an order has a
//! quantity that cannot be parsed, none of that order's items are folded.
//! The order is logged and reported in [`AggregateOutput::skipped_orders`];
//! the totals never contain part of an order.
//!
//! # Ranking
//!
//! Totals live in an insertion-ordered map and are ranked with a stable
//! sort, so keys with equal totals stay in the order they first appeared.
//!
//! ```
//! use medtally::core::aggregate::aggregate;
//! use medtally::domain::LineItem;
//!
//! # fn main() -> Result<(), String> {
//! let item = |code: &str, text: &str, qty: &str| -> Result<LineItem, String> {
//!     LineItem::builder().order_code(code)?.product(text).quantity(qty).build()
//! };
//! let items = vec![
//!     item("1-1-SE24", "PARACETAMOL 500 MG", "3")?,
//!     item("1-2-SE24", "IBUPROFENO 400 MG", "5")?,
//!     item("1-3-SE24", "PARACETAMOL 500 MG", "2")?,
//! ];
//!
//! let output = aggregate(&items);
//! assert_eq!(output.ranked[0].med_key, "PARACETAMOL 500 MG");
//! assert_eq!(output.ranked[1].med_key, "IBUPROFENO 400 MG");
//! assert_eq!(output.records.len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod record;

pub use record::{AggregateOutput, ItemRecord, RankedEntry, SkippedOrder};

use crate::domain::{LineItem, OrderCode, QuantityFormatError};
use indexmap::IndexMap;

/// Running per-key totals plus the audit records behind them
///
/// An aggregator is owned by exactly one aggregation run. Partial
/// aggregators (e.g. one per fetched day) are combined with
/// [`Aggregator::merge`].
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    totals: IndexMap<String, f64>,
    records: Vec<ItemRecord>,
    skipped_orders: Vec<SkippedOrder>,
}

impl Aggregator {
    /// Creates an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds the medication items of a single order.
    ///
    /// Either every item is folded or none is.
    ///
    /// # Errors
    ///
    /// Returns the first [`QuantityFormatError`] of the order; the order is
    /// recorded as skipped and the totals are left untouched.
    pub fn fold_order(&mut self, items: &[LineItem]) -> Result<usize, QuantityFormatError> {
        let records = match items
            .iter()
            .map(ItemRecord::from_item)
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(records) => records,
            Err(e) => {
                // items is non-empty here, the error came from one of them
                if let Some(first) = items.first() {
                    self.skip_order(first.order_code.clone(), e.clone());
                }
                return Err(e);
            }
        };

        let folded = records.len();
        for record in records {
            self.push(record);
        }
        Ok(folded)
    }

    /// Merges a partial aggregate into this one by key sum.
    ///
    /// Keys new to `self` are appended in `other`'s first-appearance order;
    /// records and skipped orders are appended after the existing ones.
    pub fn merge(&mut self, other: Aggregator) {
        for (key, quantity) in other.totals {
            *self.totals.entry(key).or_insert(0.0) += quantity;
        }
        self.records.extend(other.records);
        self.skipped_orders.extend(other.skipped_orders);
    }

    /// Running total for a key
    pub fn total_for(&self, med_key: &str) -> Option<f64> {
        self.totals.get(med_key).copied()
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.totals.len()
    }

    /// Number of folded items
    pub fn item_count(&self) -> usize {
        self.records.len()
    }

    /// Number of skipped orders
    pub fn skipped_count(&self) -> usize {
        self.skipped_orders.len()
    }

    /// Ranks the totals and hands out the records
    pub fn finish(self) -> AggregateOutput {
        let mut ranked: Vec<RankedEntry> = self
            .totals
            .into_iter()
            .map(|(med_key, total_quantity)| RankedEntry {
                med_key,
                total_quantity,
            })
            .collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.total_quantity.total_cmp(&a.total_quantity));

        AggregateOutput {
            ranked,
            records: self.records,
            skipped_orders: self.skipped_orders,
        }
    }

    fn push(&mut self, record: ItemRecord) {
        *self.totals.entry(record.med_key.clone()).or_insert(0.0) += record.quantity;
        self.records.push(record);
    }

    fn skip_order(&mut self, order_code: OrderCode, error: QuantityFormatError) {
        tracing::warn!(
            order_code = %order_code,
            quantity = %error.raw,
            "Skipping order with invalid quantity"
        );
        self.skipped_orders.push(SkippedOrder { order_code, error });
    }
}

/// Aggregates a sequence of medication line items.
///
/// Items are folded in the given order. Items of an order that contains an
/// unparseable or negative quantity are left out wherever they appear in the sequence.
/// An empty sequence gives an empty output.
pub fn aggregate(items: &[LineItem]) -> AggregateOutput {
    let transformed: Vec<Result<ItemRecord, QuantityFormatError>> =
        items.iter().map(ItemRecord::from_item).collect();

    let mut failed: IndexMap<&OrderCode, QuantityFormatError> = IndexMap::new();
    for (item, result) in items.iter().zip(&transformed) {
        if let Err(e) = result {
            failed.entry(&item.order_code).or_insert_with(|| e.clone());
        }
    }

    let mut aggregator = Aggregator::new();
    for (item, result) in items.iter().zip(transformed) {
        if failed.contains_key(&item.order_code) {
            continue;
        }
        if let Ok(record) = result {
            aggregator.push(record);
        }
    }
    for (order_code, error) in failed {
        aggregator.skip_order(order_code.clone(), error);
    }

    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(order: &str, text: &str, quantity: &str) -> LineItem {
        LineItem::builder()
            .order_code(order)
            .unwrap()
            .product(text)
            .quantity(quantity)
            .build()
            .unwrap()
    }

    fn ranked(output: &AggregateOutput) -> Vec<(&str, f64)> {
        output
            .ranked
            .iter()
            .map(|e| (e.med_key.as_str(), e.total_quantity))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let output = aggregate(&[]);
        assert!(output.ranked.is_empty());
        assert!(output.records.is_empty());
        assert!(output.skipped_orders.is_empty());
    }

    #[test]
    fn test_sums_by_key_and_ranks_descending() {
        let items = vec![
            item("1", "A", "1"),
            item("2", "B", "10"),
            item("3", "C", "4"),
            item("4", "A", "2,5"),
        ];
        let output = aggregate(&items);
        assert_eq!(ranked(&output), vec![("B", 10.0), ("C", 4.0), ("A", 3.5)]);
    }

    #[test]
    fn test_ties_keep_first_appearance() {
        let items = vec![item("1", "A", "3"), item("2", "B", "5"), item("3", "A", "2")];
        let output = aggregate(&items);
        assert_eq!(ranked(&output), vec![("A", 5.0), ("B", 5.0)]);

        let items = vec![item("1", "B", "5"), item("2", "A", "3"), item("3", "A", "2")];
        let output = aggregate(&items);
        assert_eq!(ranked(&output), vec![("B", 5.0), ("A", 5.0)]);
    }

    #[test]
    fn test_records_in_consumption_order() {
        let items = vec![item("1", "B", "1"), item("2", "A", "2"), item("3", "B", "3")];
        let output = aggregate(&items);
        let keys: Vec<&str> = output.records.iter().map(|r| r.med_key.as_str()).collect();
        assert_eq!(keys, vec!["B", "A", "B"]);
        assert_eq!(output.records[2].order_code.as_str(), "3");
    }

    #[test]
    fn test_bad_quantity_skips_whole_order() {
        let items = vec![
            item("1", "A", "2"),
            item("2", "A", "3"),
            item("2", "B", "x"),
            item("3", "B", "4"),
            item("2", "C", "7"),
        ];
        let output = aggregate(&items);

        assert_eq!(ranked(&output), vec![("B", 4.0), ("A", 2.0)]);
        assert_eq!(output.records.len(), 2);
        assert_eq!(output.skipped_orders.len(), 1);
        assert_eq!(output.skipped_orders[0].order_code.as_str(), "2");
        assert_eq!(output.skipped_orders[0].error.raw, "x");
    }

    #[test]
    fn test_negative_quantity_skips_whole_order() {
        let output = aggregate(&[item("1", "A", "5"), item("2", "A", "-3")]);

        assert_eq!(ranked(&output), vec![("A", 5.0)]);
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.skipped_orders.len(), 1);
        assert_eq!(output.skipped_orders[0].order_code.as_str(), "2");
        assert_eq!(output.skipped_orders[0].error.raw, "-3");
    }

    #[test]
    fn test_missing_quantity_counts_as_zero() {
        let mut no_qty = item("1", "A", "");
        no_qty.quantity = None;
        let output = aggregate(&[no_qty, item("2", "B", "1")]);
        assert_eq!(ranked(&output), vec![("B", 1.0), ("A", 0.0)]);
    }

    #[test]
    fn test_fold_order_is_atomic() {
        let mut aggregator = Aggregator::new();
        assert_eq!(
            aggregator
                .fold_order(&[item("1", "A", "1"), item("1", "B", "2")])
                .unwrap(),
            2
        );

        let err = aggregator
            .fold_order(&[item("2", "A", "5"), item("2", "B", "??")])
            .unwrap_err();
        assert_eq!(err.raw, "??");
        assert_eq!(aggregator.total_for("A"), Some(1.0));
        assert_eq!(aggregator.item_count(), 2);
        assert_eq!(aggregator.skipped_count(), 1);

        let err = aggregator
            .fold_order(&[item("3", "B", "4"), item("3", "A", "-3")])
            .unwrap_err();
        assert_eq!(err.raw, "-3");
        assert_eq!(aggregator.total_for("A"), Some(1.0));
        assert_eq!(aggregator.total_for("B"), Some(2.0));
        assert_eq!(aggregator.item_count(), 2);
        assert_eq!(aggregator.skipped_count(), 2);

        assert_eq!(aggregator.fold_order(&[]).unwrap(), 0);
    }

    #[test]
    fn test_merge_equals_single_pass() {
        let day_one = vec![item("1", "A", "1"), item("2", "B", "4")];
        let day_two = vec![item("3", "C", "4"), item("4", "A", "3")];

        let mut first = Aggregator::new();
        first.fold_order(&day_one[..1]).unwrap();
        first.fold_order(&day_one[1..]).unwrap();
        let mut second = Aggregator::new();
        second.fold_order(&day_two[..1]).unwrap();
        second.fold_order(&day_two[1..]).unwrap();
        first.merge(second);
        let merged = first.finish();

        let all: Vec<LineItem> = day_one.into_iter().chain(day_two).collect();
        assert_eq!(merged, aggregate(&all));
        assert_eq!(ranked(&merged), vec![("A", 4.0), ("B", 4.0), ("C", 4.0)]);
    }

    #[test]
    fn test_totals_never_decrease() {
        let mut aggregator = Aggregator::new();
        let mut previous = 0.0;
        for quantity in ["1", "0", "2,5", "", "4"] {
            aggregator.fold_order(&[item("1", "A", quantity)]).unwrap();
            let total = aggregator.total_for("A").unwrap();
            assert!(total >= previous);
            previous = total;
        }
        assert_eq!(previous, 7.5);
        assert_eq!(aggregator.key_count(), 1);
    }
}
