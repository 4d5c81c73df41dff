//! Per-call conversion context
//!
//! Options are resolved once into an immutable [`ConversionContext`] that is
//! passed by reference through every recursive mapping call.
//!
//! Copyright (c) 2025 Coltrans Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::resolver::DescriptionPolicy;
use crate::types::{ConversionOptions, SchemaFamily, SchemaVersion};

/// Direction of a supported conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    V1ToV2,
    V2ToV1,
}

/// Resolved options for a single conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionContext {
    pub input: SchemaVersion,
    pub output: SchemaVersion,
    pub direction: Direction,
    pub retain_ids: bool,
    pub prioritize_v2: bool,
    pub descriptions: DescriptionPolicy,
}

impl ConversionContext {
    /// Resolve caller options
    ///
    /// Fails with [`Error::InvalidVersion`] when a version string cannot be
    /// parsed and with [`Error::UnsupportedConversion`] when no path exists
    /// between the two versions.
    pub fn from_options(options: &ConversionOptions) -> Result<Self> {
        let input = SchemaVersion::parse(&options.input_version)?;
        let output = SchemaVersion::parse(&options.output_version)?;

        let direction = match (input.family(), output.family()) {
            (Some(SchemaFamily::V1), Some(SchemaFamily::V2)) => Direction::V1ToV2,
            (Some(SchemaFamily::V2), Some(SchemaFamily::V1)) => Direction::V2ToV1,
            _ => {
                return Err(Error::UnsupportedConversion {
                    input: options.input_version.clone(),
                    output: options.output_version.clone(),
                })
            }
        };

        Ok(Self {
            input,
            output,
            direction,
            retain_ids: options.retain_ids,
            prioritize_v2: options.prioritize_v2,
            descriptions: DescriptionPolicy::new(options.retain_empty_values),
        })
    }

    /// Schema URL written into `info.schema` of v2 output
    pub fn schema_url(&self) -> String {
        self.output.schema_url()
    }
}
