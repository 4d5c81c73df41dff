//! Auth resolution
//!
//! v1 entities describe auth either through the legacy helper fields
//! (`currentHelper` plus `helperAttributes`) or through a modern `auth`
//! object. v2 only knows the latter, with the parameters of the active type
//! collapsed into a keyed object.
//!
//! Copyright (c) 2025 Coltrans Team
//! Licensed under the Apache-2.0 license

use super::{resolve, Presence, Resolution};
use crate::value::{non_empty_str, objects};
use serde_json::{json, Map, Value};

/// Legacy helper names and the auth type each one stands for
pub const HELPER_TYPES: &[(&str, &str)] = &[
    ("basicAuth", "basic"),
    ("bearerAuth", "bearer"),
    ("digestAuth", "digest"),
    ("oAuth1", "oauth1"),
    ("oAuth2", "oauth2"),
    ("hawkAuth", "hawk"),
    ("awsSigV4", "awsv4"),
    ("ntlmAuth", "ntlm"),
    ("apikeyAuth", "apikey"),
    ("edgegridAuth", "edgegrid"),
];

/// Helper value that means "no auth"
const NORMAL_HELPER: &str = "normal";

const NOAUTH: &str = "noauth";

/// Auth type for a legacy helper name. Unknown helpers keep their name.
pub fn helper_to_type(helper: &str) -> &str {
    HELPER_TYPES
        .iter()
        .find(|(name, _)| *name == helper)
        .map_or(helper, |(_, auth_type)| *auth_type)
}

/// Whether a resolved v2 `auth` is the explicit `noauth` marker
pub fn is_noauth(auth: &Value) -> bool {
    non_empty_str(auth.get("type")) == Some(NOAUTH)
}

/// Legacy helper name for an auth type
pub fn type_to_helper(auth_type: &str) -> Option<&'static str> {
    HELPER_TYPES
        .iter()
        .find(|(_, t)| *t == auth_type)
        .map(|(name, _)| *name)
}

/// Resolve the v2 `auth` of a v1 request, folder or collection
///
/// Returns `None` when the output must not carry an `auth` key at all.
pub fn auth_from_v1(entity: &Map<String, Value>, prioritize_v2: bool) -> Option<Value> {
    match resolve(legacy_presence(entity), modern_presence(entity), prioritize_v2) {
        Resolution::Legacy => legacy_auth(entity),
        Resolution::Modern => entity
            .get("auth")
            .and_then(Value::as_object)
            .and_then(modern_auth),
        Resolution::Omit => None,
    }
}

/// The `currentHelper` key claims precedence as soon as it exists, even when
/// it holds `null` or `"normal"`.
fn legacy_presence(entity: &Map<String, Value>) -> Presence {
    match entity.get("currentHelper") {
        None => Presence::Absent,
        Some(helper) => match non_empty_str(Some(helper)) {
            Some(NORMAL_HELPER) | None => Presence::Declared,
            Some(_) => Presence::Usable,
        },
    }
}

fn modern_presence(entity: &Map<String, Value>) -> Presence {
    let auth_type = entity
        .get("auth")
        .and_then(Value::as_object)
        .and_then(|auth| non_empty_str(auth.get("type")));

    match auth_type {
        Some(_) => Presence::Usable,
        None => Presence::Absent,
    }
}

fn legacy_auth(entity: &Map<String, Value>) -> Option<Value> {
    let helper = non_empty_str(entity.get("currentHelper"))?;
    let auth_type = helper_to_type(helper);

    let mut params: Map<String, Value> = entity
        .get("helperAttributes")
        .and_then(Value::as_object)
        .map(|attributes| {
            attributes
                .iter()
                .filter(|(key, _)| key.as_str() != "id")
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default();

    if auth_type == "basic" {
        params
            .entry("showPassword".to_string())
            .or_insert(Value::Bool(false));
    }

    log::debug!("auth resolved from legacy helper {}", helper);

    let mut auth = Map::new();
    auth.insert("type".to_string(), Value::String(auth_type.to_string()));
    auth.insert(auth_type.to_string(), Value::Object(params));
    Some(Value::Object(auth))
}

fn modern_auth(auth: &Map<String, Value>) -> Option<Value> {
    let auth_type = non_empty_str(auth.get("type"))?;
    if auth_type == NOAUTH {
        return Some(json!({ "type": NOAUTH }));
    }

    let mut resolved = Map::new();
    resolved.insert("type".to_string(), Value::String(auth_type.to_string()));

    match auth.get(auth_type) {
        Some(Value::Array(_)) => {
            let params = collapse_pairs(auth.get(auth_type));
            resolved.insert(auth_type.to_string(), Value::Object(params));
        }
        Some(params @ Value::Object(_)) => {
            resolved.insert(auth_type.to_string(), params.clone());
        }
        _ => {}
    }

    Some(Value::Object(resolved))
}

/// Collapse `[{key, value, type}]` into `{key: value}`. Later keys win.
fn collapse_pairs(pairs: Option<&Value>) -> Map<String, Value> {
    objects(pairs)
        .filter_map(|pair| {
            let key = pair.get("key").and_then(Value::as_str)?;
            let value = pair.get("value").cloned().unwrap_or(Value::Null);
            Some((key.to_string(), value))
        })
        .collect()
}

/// Build the v1 auth fields of a v2 `auth`
///
/// Produces the modern `auth` with its parameters as a typed pair array and,
/// when the type has a legacy helper, `currentHelper` and `helperAttributes`.
/// `noauth` only yields the modern `auth`.
pub fn auth_to_v1(auth: Option<&Value>) -> Map<String, Value> {
    let mut fields = Map::new();

    let auth = match auth.and_then(Value::as_object) {
        Some(auth) => auth,
        None => return fields,
    };
    let auth_type = match non_empty_str(auth.get("type")) {
        Some(auth_type) => auth_type,
        None => return fields,
    };

    if auth_type == NOAUTH {
        fields.insert("auth".to_string(), json!({ "type": NOAUTH }));
        return fields;
    }

    let params: Map<String, Value> = match auth.get(auth_type) {
        Some(Value::Object(params)) => params.clone(),
        Some(pairs @ Value::Array(_)) => collapse_pairs(Some(pairs)),
        _ => Map::new(),
    };

    let pairs: Vec<Value> = params
        .iter()
        .map(|(key, value)| json!({ "key": key, "value": value, "type": pair_type(value) }))
        .collect();

    let mut modern = Map::new();
    modern.insert("type".to_string(), Value::String(auth_type.to_string()));
    modern.insert(auth_type.to_string(), Value::Array(pairs));
    fields.insert("auth".to_string(), Value::Object(modern));

    if let Some(helper) = type_to_helper(auth_type) {
        let mut attributes = Map::new();
        attributes.insert("id".to_string(), Value::String(auth_type.to_string()));
        attributes.extend(params);

        fields.insert("currentHelper".to_string(), Value::String(helper.to_string()));
        fields.insert("helperAttributes".to_string(), Value::Object(attributes));
    }

    fields
}

fn pair_type(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        _ => "any",
    }
}
