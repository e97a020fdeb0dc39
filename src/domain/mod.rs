//! Domain models and types for Medtally.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`OrderCode`])
//! - **Domain models** ([`LineItem`], [`PurchaseOrder`], [`LooseValue`])
//! - **Error types** ([`MedTallyError`], [`SourceError`], [`QuantityFormatError`])
//! - **Result type alias** ([`Result`])
//!
//! # Builder Pattern
//!
//! ```rust
//! use medtally::domain::LineItem;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let item = LineItem::builder()
//!     .order_code("1057-123-SE24")?
//!     .category_code("51101500")
//!     .supplier_spec("Paracetamol 500 mg comprimidos")
//!     .quantity("1.000")
//!     .unit("Comprimido")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod line_item;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{MedTallyError, QuantityFormatError, SourceError};
pub use ids::OrderCode;
pub use line_item::{LineItem, LineItemBuilder, LooseValue, PurchaseOrder};
pub use result::Result;
