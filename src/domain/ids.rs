//! Domain identifier types with validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Purchase-order code newtype wrapper
///
/// Identifies an order in the procurement API, e.g. `1057-123-SE24`.
/// The format is owned by the API; only emptiness is rejected.
///
/// # Examples
///
/// ```
/// use medtally::domain::ids::OrderCode;
/// use std::str::FromStr;
///
/// let code = OrderCode::from_str("1057-123-SE24").unwrap();
/// assert_eq!(code.as_str(), "1057-123-SE24");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderCode(String);

impl OrderCode {
    /// Creates a new OrderCode from a string
    ///
    /// Returns `Err` if the code is empty or only whitespace
    pub fn new(code: impl Into<String>) -> Result<Self, String> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err("Order code cannot be empty".to_string());
        }
        Ok(Self(code))
    }

    /// Returns the order code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OrderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for OrderCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
