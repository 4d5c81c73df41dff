//! Conversion dispatcher
//!
//! Resolves the caller's options into a [`ConversionContext`] and routes the
//! document to the mapper for the requested direction. Apart from option
//! errors every entry point succeeds; malformed input degrades by omission.
//!
//! Copyright (c) 2025 Coltrans Team
//! Licensed under the Apache-2.0 license

pub mod context;
pub mod tree;
pub mod v1_to_v2;
pub mod v2_to_v1;

use crate::error::Result;
use crate::types::ConversionOptions;
use serde_json::{Map, Value};
use tracing::{debug, debug_span};

pub use context::{ConversionContext, Direction};
pub use tree::{build_tree, flatten, Flattened, TreeBuilder};
pub use v1_to_v2::ForwardMapper;
pub use v2_to_v1::ReverseMapper;

/// Entity kind handled by one dispatcher entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Collection,
    Single,
    Response,
}

fn dispatch(document: &Value, options: &ConversionOptions, target: Target) -> Result<Value> {
    let context = ConversionContext::from_options(options)?;

    let span = debug_span!(
        "convert",
        kind = ?target,
        input = %context.input,
        output = %context.output
    );
    let _enter = span.enter();

    let empty = Map::new();
    let document = match document.as_object() {
        Some(document) => document,
        None => {
            debug!("input is not a JSON object, converting an empty document");
            &empty
        }
    };

    let converted = match context.direction {
        Direction::V1ToV2 => match target {
            Target::Collection => v1_to_v2::convert_collection(&context, document),
            Target::Single => v1_to_v2::convert_single(&context, document),
            Target::Response => v1_to_v2::convert_response(&context, document),
        },
        Direction::V2ToV1 => match target {
            Target::Collection => v2_to_v1::convert_collection(&context, document),
            Target::Single => v2_to_v1::convert_single(&context, document),
            Target::Response => v2_to_v1::convert_response(&context, document),
        },
    };

    debug!(direction = ?context.direction, "conversion finished");
    Ok(converted)
}

/// Convert a whole collection between schema versions
///
/// # Errors
///
/// Returns an error if either version string is invalid or no conversion
/// path exists between them. Same-family pairs such as `2.0.0` → `2.1.0`
/// are unsupported.
///
/// # Example
///
/// ```
/// use coltrans_core::{convert, ConversionOptions};
/// use serde_json::json;
///
/// let v1 = json!({"id": "C1", "name": "demo", "requests": [], "order": []});
/// let v2 = convert(&v1, &ConversionOptions::new("1.0.0", "2.0.0")).unwrap();
/// assert_eq!(v2["info"]["_postman_id"], "C1");
/// ```
pub fn convert(collection: &Value, options: &ConversionOptions) -> Result<Value> {
    dispatch(collection, options, Target::Collection)
}

/// Convert one request or folder (v1) or one item (v2)
pub fn convert_single(entity: &Value, options: &ConversionOptions) -> Result<Value> {
    dispatch(entity, options, Target::Single)
}

/// Convert one response
pub fn convert_response(response: &Value, options: &ConversionOptions) -> Result<Value> {
    dispatch(response, options, Target::Response)
}

/// Callback form of [`convert`]; `callback` runs exactly once
pub fn convert_with<F>(collection: &Value, options: &ConversionOptions, callback: F)
where
    F: FnOnce(Result<Value>),
{
    callback(convert(collection, options))
}

/// Callback form of [`convert_single`]; `callback` runs exactly once
pub fn convert_single_with<F>(entity: &Value, options: &ConversionOptions, callback: F)
where
    F: FnOnce(Result<Value>),
{
    callback(convert_single(entity, options))
}

/// Callback form of [`convert_response`]; `callback` runs exactly once
pub fn convert_response_with<F>(response: &Value, options: &ConversionOptions, callback: F)
where
    F: FnOnce(Result<Value>),
{
    callback(convert_response(response, options))
}
