//! Shared test support utilities for integration tests

#![allow(dead_code)]

use coltrans_core::ConversionOptions;
use regex::Regex;
use serde_json::Value;

/// Options for v1 → v2.0.0 with ids retained
pub fn forward() -> ConversionOptions {
    ConversionOptions::new("1.0.0", "2.0.0").with_retain_ids(true)
}

/// Forward options with `prioritizeV2` set
pub fn forward_prioritized() -> ConversionOptions {
    forward().with_prioritize_v2(true)
}

/// Forward options with `retainEmptyValues` set
pub fn forward_retaining_empty() -> ConversionOptions {
    forward().with_retain_empty_values(true)
}

/// Options for v2.0.0 → v1 with ids retained
pub fn reverse() -> ConversionOptions {
    ConversionOptions::new("2.0.0", "1.0.0").with_retain_ids(true)
}

/// Parse a JSON fixture
pub fn fixture(source: &str) -> Value {
    serde_json::from_str(source).expect("fixture is valid JSON")
}

/// Whether `id` is a canonical lowercase v4-style uuid
pub fn is_uuid(id: &Value) -> bool {
    let pattern = Regex::new(r"^[a-f0-9]{8}(-[a-f0-9]{4}){3}-[a-f0-9]{12}$").unwrap();
    id.as_str().map_or(false, |id| pattern.is_match(id))
}

/// The `_postman_id`s of an item list
pub fn item_ids(items: &Value) -> Vec<String> {
    items
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["_postman_id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
