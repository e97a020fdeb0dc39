//! Medication classification by category code

use crate::domain::{LineItem, LooseValue};

/// Category codes starting with this prefix are medications
pub const MEDICATION_CATEGORY_PREFIX: &str = "51";

/// Whether a line item belongs to the medication category.
///
/// Only the category code participates; see [`is_medication_code`].
pub fn classify(item: &LineItem) -> bool {
    is_medication_code(item.category_code.as_ref())
}

/// Whether a raw category code starts with [`MEDICATION_CATEGORY_PREFIX`].
///
/// Absent and falsy codes render as the empty string. Length and format of
/// the rest of the code are not checked; anything unexpected is simply not
/// a medication.
///
/// # Examples
///
/// ```
/// use medtally::core::medication::is_medication_code;
/// use medtally::domain::LooseValue;
///
/// assert!(is_medication_code(Some(&LooseValue::from("5107"))));
/// assert!(is_medication_code(Some(&LooseValue::from(51101500))));
/// assert!(!is_medication_code(Some(&LooseValue::from("4501"))));
/// assert!(!is_medication_code(None));
/// ```
pub fn is_medication_code(code: Option<&LooseValue>) -> bool {
    code.filter(|c| !c.is_falsy())
        .map(|c| c.to_text().starts_with(MEDICATION_CATEGORY_PREFIX))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with_code(code: Option<LooseValue>) -> LineItem {
        let mut item = LineItem::builder()
            .order_code("1057-123-SE24")
            .unwrap()
            .build()
            .unwrap();
        item.category_code = code;
        item
    }

    #[test]
    fn test_medication_prefix() {
        assert!(classify(&item_with_code(Some("5107".into()))));
        assert!(classify(&item_with_code(Some("51".into()))));
        assert!(classify(&item_with_code(Some(51171800.into()))));
    }

    #[test]
    fn test_non_medication() {
        assert!(!classify(&item_with_code(Some("4501".into()))));
        assert!(!classify(&item_with_code(None)));
        assert!(!classify(&item_with_code(Some("".into()))));
        assert!(!classify(&item_with_code(Some("5".into()))));
        assert!(!classify(&item_with_code(Some(" 5107".into()))));
        assert!(!classify(&item_with_code(Some(0.into()))));
        assert!(!classify(&item_with_code(Some(LooseValue::Flag(true)))));
    }

    #[test]
    fn test_prefix_is_loose() {
        // any suffix is accepted, including non-digits
        assert!(is_medication_code(Some(&LooseValue::from("51-XYZ"))));
        assert!(is_medication_code(Some(&LooseValue::from(51.5))));
    }
}
