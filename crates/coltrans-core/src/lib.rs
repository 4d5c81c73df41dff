//! Coltrans Core - conversion engine for API collection documents
//!
//! This crate converts collection documents between the flat v1 schema
//! (entities plus order arrays) and the nested v2 schema (item tree), in both
//! directions.
//!
//! # Main Components
//!
//! - **Error Handling**: Error types using `thiserror`
//! - **Core Types**: Schema versions and conversion options
//! - **Codecs**: URL, body and header encodings
//! - **Field Resolver**: Precedence between legacy and modern v1 fields
//! - **Conversion**: Tree building and per-entity mapping
//!
//! # Example
//!
//! ```
//! use coltrans_core::{convert, ConversionOptions, Result};
//! use serde_json::json;
//!
//! fn example() -> Result<()> {
//!     let v1 = json!({
//!         "id": "C1",
//!         "name": "collection",
//!         "requests": [{"id": "R1", "name": "request one"}],
//!         "order": ["R1"]
//!     });
//!
//!     let v2 = convert(&v1, &ConversionOptions::new("1.0.0", "2.0.0"))?;
//!     assert_eq!(v2["item"][0]["_postman_id"], "R1");
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod codec;
pub mod conversion;
pub mod error;
pub mod ids;
pub mod resolver;
pub mod types;
pub mod value;

// Re-export main types for convenience
pub use conversion::{
    convert, convert_response, convert_response_with, convert_single, convert_single_with,
    convert_with, ConversionContext, Direction,
};
pub use error::{Error, Result};
pub use types::{ConversionOptions, SchemaFamily, SchemaVersion};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod proptest_strategies;
