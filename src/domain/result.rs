//! Result type alias for Medtally

use super::errors::MedTallyError;

/// Result type alias for Medtally operations
///
/// # Examples
///
/// ```
/// use medtally::domain::result::Result;
/// use medtally::domain::errors::MedTallyError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(MedTallyError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, MedTallyError>;
