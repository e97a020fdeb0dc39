//! Free-text normalization

/// Trims, collapses every whitespace run into a single space and uppercases.
///
/// Absent input yields an empty string. Case mapping is Unicode aware, so
/// accented letters such as `á` and `ñ` become `Á` and `Ñ`.
///
/// # Examples
///
/// ```
/// use medtally::core::medication::normalize_text;
///
/// assert_eq!(normalize_text(Some("  paracetamol\n\t500  mg ")), "PARACETAMOL 500 MG");
/// assert_eq!(normalize_text(Some("solución oftálmica")), "SOLUCIÓN OFTÁLMICA");
/// assert_eq!(normalize_text(None), "");
/// ```
pub fn normalize_text(text: Option<&str>) -> String {
    match text {
        Some(text) => text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase(),
        None => String::new(),
    }
}
