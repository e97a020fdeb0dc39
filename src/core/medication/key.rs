//! Medication key derivation
//!
//! A medication key identifies "the same drug" across purchase orders written
//! by thousands of different buyers and suppliers. It is a text heuristic:
//! the description fields of an item are joined and normalized, then the
//! first `<letters> <strength> <unit>` triple is taken as the drug identity.
//!
//! | Text                                   | Key                            |
//! |----------------------------------------|--------------------------------|
//! | `Paracetamol 500 mg comprimidos`       | `PARACETAMOL 500 MG`           |
//! | `IBUPROFENO 200MG`                     | `IBUPROFENO 200 MG`            |
//! | `Cloruro de sodio 0,9 % 500 ml`        | `CLORURO DE SODIO 0,9 %`       |
//! | `Guantes de nitrilo talla M`           | `GUANTES DE NITRILO TALLA M`   |
//! | *(no text at all)*                     | `DESCONOCIDO`                  |

use super::normalize::normalize_text;
use crate::domain::LineItem;
use regex::Regex;
use std::sync::OnceLock;

/// Key used when an item carries no description text at all
pub const UNKNOWN_KEY: &str = "DESCONOCIDO";

/// Maximum number of words kept from the generic name
pub const MAX_GENERIC_WORDS: usize = 4;

/// Letters group (lazy), strength, unit, then end of text or a non-letter.
///
/// Units are tried in the listed order, so `MG` is attempted before `MCG`
/// and `G`. The trailing group consumes the boundary character; it is never
/// part of a capture.
const STRENGTH_PATTERN: &str =
    r"([A-ZÁÉÍÓÚÑ/+\- ]{3,}?)\s+(\d{1,4}(?:[.,]\d{1,3})?)\s*(MG|MCG|G|ML|UI|U|%)(?:\P{L}|$)";

fn strength_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(STRENGTH_PATTERN).expect("strength pattern is valid"))
}

/// Derives the medication key of a line item.
///
/// See [`derive_key_from_fields`].
pub fn derive_key(item: &LineItem) -> String {
    derive_key_from_fields(item.description_fields())
}

/// Derives a medication key from the four description fields, given in the
/// order supplier spec, buyer spec, product name, product.
///
/// Missing fields count as empty strings. The fields are joined with single
/// spaces and normalized; the earliest `<letters> <strength> <unit>` match
/// wins. Without a match the normalized text itself is the key, or
/// [`UNKNOWN_KEY`] if there is no text.
///
/// # Examples
///
/// ```
/// use medtally::core::medication::derive_key_from_fields;
///
/// let key = derive_key_from_fields([Some("Paracetamol 500 mg"), None, None, Some("Comprimido")]);
/// assert_eq!(key, "PARACETAMOL 500 MG");
///
/// let key = derive_key_from_fields([None, None, None, None]);
/// assert_eq!(key, "DESCONOCIDO");
/// ```
pub fn derive_key_from_fields(fields: [Option<&str>; 4]) -> String {
    let joined = fields
        .iter()
        .map(|field| field.unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ");
    let text = normalize_text(Some(&joined));

    if let Some(caps) = strength_pattern().captures(&text) {
        let generic = normalize_text(Some(&caps[1]))
            .split(' ')
            .take(MAX_GENERIC_WORDS)
            .collect::<Vec<_>>()
            .join(" ");
        return format!("{} {} {}", generic, &caps[2], &caps[3]);
    }

    if text.is_empty() {
        UNKNOWN_KEY.to_string()
    } else {
        text
    }
}
