//! Error types for the Coltrans core library
//!
//! Only invocation-level misuse is an error. Malformed entities, dangling
//! order ids and unparseable URLs degrade by omission or defaulting and never
//! surface here.

use thiserror::Error;

/// Main error type for Coltrans operations
#[derive(Error, Debug)]
pub enum Error {
    /// No conversion path exists between the requested schema versions
    #[error("Unsupported conversion: no path from {input} to {output}")]
    UnsupportedConversion {
        input: String,
        output: String,
    },

    /// A version string could not be understood
    #[error("Invalid schema version '{version}': {message}")]
    InvalidVersion {
        version: String,
        message: String,
    },

    /// Options could not be decoded from JSON
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error came from a version pair with no conversion path
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::UnsupportedConversion { .. })
    }
}
