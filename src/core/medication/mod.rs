//! Medication text heuristics
//!
//! Pure, synchronous building blocks applied to every fetched line item:
//!
//! - [`normalize_text`] - whitespace collapsing and uppercasing
//! - [`classify`] - category-code prefix rule
//! - [`derive_key`] - "generic + strength + unit" medication key
//! - [`coerce_quantity`] - locale-formatted quantity parsing

pub mod classify;
pub mod key;
pub mod normalize;
pub mod quantity;

pub use classify::{classify, is_medication_code, MEDICATION_CATEGORY_PREFIX};
pub use key::{derive_key, derive_key_from_fields, MAX_GENERIC_WORDS, UNKNOWN_KEY};
pub use normalize::normalize_text;
pub use quantity::coerce_quantity;
