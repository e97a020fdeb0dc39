//! Quantity coercion

use crate::domain::{LooseValue, QuantityFormatError};

/// Parses a raw quantity into a float.
///
/// Absent and falsy values (empty text, zero, `false`) are `0.0`. Anything
/// else is rendered as text, every comma becomes a period, and the result
/// must parse as a finite float.
///
/// # Errors
///
/// Returns [`QuantityFormatError`] when the text is not a float literal,
/// e.g. `"1.000,5"` (which becomes `"1.000.5"`) or `"N/A"`.
///
/// # Examples
///
/// ```
/// use medtally::core::medication::coerce_quantity;
/// use medtally::domain::LooseValue;
///
/// assert_eq!(coerce_quantity(Some(&LooseValue::from("1,5"))).unwrap(), 1.5);
/// assert_eq!(coerce_quantity(Some(&LooseValue::from(0))).unwrap(), 0.0);
/// assert_eq!(coerce_quantity(None).unwrap(), 0.0);
/// assert!(coerce_quantity(Some(&LooseValue::from("N/A"))).is_err());
/// ```
pub fn coerce_quantity(raw: Option<&LooseValue>) -> Result<f64, QuantityFormatError> {
    let value = match raw {
        Some(value) if !value.is_falsy() => value,
        _ => return Ok(0.0),
    };

    let text = value.to_text();
    match text.replace(',', ".").trim().parse::<f64>() {
        Ok(quantity) if quantity.is_finite() => Ok(quantity),
        _ => Err(QuantityFormatError::new(text)),
    }
}
