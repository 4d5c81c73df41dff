//! Identifier management
//!
//! Nested folder, request and response ids are retained or regenerated
//! according to `retainIds`. The collection's own id is always retained; see
//! [`resolve_root_id`].

use crate::value::non_empty_str;
use serde_json::Value;
use uuid::Uuid;

/// Generate a fresh identifier in canonical 8-4-4-4-12 hex form
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Keep `existing` when it is a usable id and `retain` is set, otherwise
/// generate a new one
pub fn resolve_id(existing: Option<&Value>, retain: bool) -> String {
    match non_empty_str(existing) {
        Some(id) if retain => id.to_string(),
        _ => generate_id(),
    }
}

/// Resolve the collection id, ignoring the `retainIds` option
pub fn resolve_root_id(existing: Option<&Value>) -> String {
    resolve_id(existing, true)
}
