//! Core types for the Coltrans conversion engine
//!
//! Schema versions and the caller-facing options value live here. Options are
//! resolved into an immutable [`crate::conversion::ConversionContext`] once per
//! call.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Base URL for the published v2 collection schemas
const SCHEMA_BASE_URL: &str = "https://schema.getpostman.com/json/collection";

/// Schema family a version belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaFamily {
    /// Flat representation with order arrays
    V1,
    /// Nested item tree
    V2,
}

/// Collection schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SchemaVersion {
    pub const V1_0_0: SchemaVersion = SchemaVersion::new(1, 0, 0);
    pub const V2_0_0: SchemaVersion = SchemaVersion::new(2, 0, 0);
    pub const V2_1_0: SchemaVersion = SchemaVersion::new(2, 1, 0);

    /// Create a new version
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Parse a version string
    ///
    /// Accepts an optional `v` prefix and one to three numeric components, so
    /// `"1.0.0"`, `"v2.1.0"` and `"2.1"` are all valid. Pre-release and build
    /// suffixes are ignored.
    pub fn parse(version_str: &str) -> Result<Self> {
        let trimmed = version_str.trim();
        let trimmed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let core = trimmed
            .split(|c| c == '-' || c == '+')
            .next()
            .unwrap_or_default();

        let parts: Vec<&str> = core.split('.').collect();
        if core.is_empty() || parts.len() > 3 {
            return Err(Error::InvalidVersion {
                version: version_str.to_string(),
                message: format!("Expected format X.Y.Z, got: {}", trimmed),
            });
        }

        let mut numbers = [0u32; 3];
        for (slot, (part, label)) in numbers
            .iter_mut()
            .zip(parts.iter().zip(["major", "minor", "patch"]))
        {
            *slot = part.parse().map_err(|_| Error::InvalidVersion {
                version: version_str.to_string(),
                message: format!("Invalid {} version: {}", label, part),
            })?;
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }

    /// The schema family, if this version is one the engine understands
    pub fn family(&self) -> Option<SchemaFamily> {
        match (self.major, self.minor) {
            (1, _) => Some(SchemaFamily::V1),
            (2, 0) | (2, 1) => Some(SchemaFamily::V2),
            _ => None,
        }
    }

    /// The `info.schema` URL written into v2 documents
    pub fn schema_url(&self) -> String {
        format!("{}/v{}/collection.json", SCHEMA_BASE_URL, self)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SchemaVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn default_retain_ids() -> bool {
    true
}

/// Options controlling a single conversion call
///
/// Field names follow the camelCase convention of the JSON options object
/// (`inputVersion`, `retainIds`, `prioritizeV2`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOptions {
    /// Schema version of the input document
    pub input_version: String,

    /// Schema version to produce
    pub output_version: String,

    /// Keep existing nested ids instead of generating fresh ones
    #[serde(default = "default_retain_ids")]
    pub retain_ids: bool,

    /// Let modern v1 fields win over legacy ones
    #[serde(default)]
    pub prioritize_v2: bool,

    /// Emit falsy descriptions as explicit `null`
    #[serde(default)]
    pub retain_empty_values: bool,
}

impl ConversionOptions {
    /// Create options for the given version pair with default flags
    pub fn new(input_version: impl Into<String>, output_version: impl Into<String>) -> Self {
        Self {
            input_version: input_version.into(),
            output_version: output_version.into(),
            retain_ids: default_retain_ids(),
            prioritize_v2: false,
            retain_empty_values: false,
        }
    }

    /// Decode options from a JSON object
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|source| Error::Json {
            message: "Failed to decode conversion options".to_string(),
            source,
        })
    }

    pub fn with_retain_ids(mut self, retain_ids: bool) -> Self {
        self.retain_ids = retain_ids;
        self
    }

    pub fn with_prioritize_v2(mut self, prioritize_v2: bool) -> Self {
        self.prioritize_v2 = prioritize_v2;
        self
    }

    pub fn with_retain_empty_values(mut self, retain_empty_values: bool) -> Self {
        self.retain_empty_values = retain_empty_values;
        self
    }
}
