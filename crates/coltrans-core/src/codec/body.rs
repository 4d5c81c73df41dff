//! Body codec
//!
//! Maps the v1 `dataMode` tag plus its positional payload fields onto the v2
//! mode-tagged `body` object and back.
//!
//! Copyright (c) 2025 Coltrans Team
//! Licensed under the Apache-2.0 license

use crate::value::{disabled_to_enabled, enabled_to_disabled, normalize_type_tag, objects};
use serde_json::{json, Map, Value};

/// Body encoding mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyMode {
    Raw,
    Urlencoded,
    Formdata,
    File,
    Graphql,
}

impl BodyMode {
    /// Map a v1 `dataMode` value
    pub fn from_v1(data_mode: &str) -> Option<Self> {
        match data_mode {
            "raw" => Some(BodyMode::Raw),
            "urlencoded" => Some(BodyMode::Urlencoded),
            "params" => Some(BodyMode::Formdata),
            "file" | "binary" => Some(BodyMode::File),
            "graphql" => Some(BodyMode::Graphql),
            _ => None,
        }
    }

    /// Map a v2 `body.mode` value
    pub fn from_v2(mode: &str) -> Option<Self> {
        match mode {
            "raw" => Some(BodyMode::Raw),
            "urlencoded" => Some(BodyMode::Urlencoded),
            "formdata" => Some(BodyMode::Formdata),
            "file" => Some(BodyMode::File),
            "graphql" => Some(BodyMode::Graphql),
            _ => None,
        }
    }

    /// The v1 `dataMode` spelling
    pub fn as_v1_str(&self) -> &'static str {
        match self {
            BodyMode::Raw => "raw",
            BodyMode::Urlencoded => "urlencoded",
            BodyMode::Formdata => "params",
            BodyMode::File => "binary",
            BodyMode::Graphql => "graphql",
        }
    }

    /// The v2 `body.mode` spelling, also the key holding the payload
    pub fn as_v2_str(&self) -> &'static str {
        match self {
            BodyMode::Raw => "raw",
            BodyMode::Urlencoded => "urlencoded",
            BodyMode::Formdata => "formdata",
            BodyMode::File => "file",
            BodyMode::Graphql => "graphql",
        }
    }

    /// Whether the payload is a list of key/value pairs
    pub fn has_pairs(&self) -> bool {
        matches!(self, BodyMode::Urlencoded | BodyMode::Formdata)
    }
}

/// The body every request carries when no usable body data exists
pub fn default_body() -> Value {
    json!({ "mode": "raw", "raw": "" })
}

/// Build the v2 `body` of a v1 request
///
/// A missing or unrecognised `dataMode` yields [`default_body`].
pub fn body_from_v1(request: &Map<String, Value>) -> Value {
    let mode = match request
        .get("dataMode")
        .and_then(Value::as_str)
        .and_then(BodyMode::from_v1)
    {
        Some(mode) => mode,
        None => return default_body(),
    };

    let mut body = Map::new();
    body.insert("mode".to_string(), Value::String(mode.as_v2_str().to_string()));

    let payload = match mode {
        BodyMode::Raw => Value::String(raw_text(request)),
        BodyMode::Urlencoded | BodyMode::Formdata => Value::Array(
            objects(request.get("data"))
                .map(|pair| {
                    let mut pair = pair.clone();
                    enabled_to_disabled(&mut pair);
                    normalize_type_tag(&mut pair);
                    Value::Object(pair)
                })
                .collect(),
        ),
        BodyMode::File => {
            let mut file = Map::new();
            if let Some(src) = request.get("rawModeData").and_then(Value::as_str) {
                file.insert("src".to_string(), Value::String(src.to_string()));
            }
            Value::Object(file)
        }
        BodyMode::Graphql => request
            .get("graphqlModeData")
            .filter(|data| data.is_object())
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new())),
    };
    body.insert(mode.as_v2_str().to_string(), payload);

    if let Some(options) = request.get("dataOptions").filter(|o| o.is_object()) {
        body.insert("options".to_string(), options.clone());
    }
    if request.get("dataDisabled") == Some(&Value::Bool(true)) {
        body.insert("disabled".to_string(), Value::Bool(true));
    }

    Value::Object(body)
}

fn raw_text(request: &Map<String, Value>) -> String {
    match request.get("rawModeData") {
        Some(Value::String(text)) => return text.clone(),
        Some(Value::Array(parts)) => {
            return match parts.as_slice() {
                [Value::String(text)] => text.clone(),
                _ => String::new(),
            }
        }
        _ => {}
    }

    request
        .get("data")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Build the v1 body fields (`dataMode`, `data`, `rawModeData`, ...) of a v2
/// `body`
///
/// An empty raw body without options is the default body and produces no
/// fields, as does anything that is not a body object with a known mode.
pub fn body_to_v1(body: Option<&Value>) -> Map<String, Value> {
    let mut fields = Map::new();

    let body = match body.and_then(Value::as_object) {
        Some(body) => body,
        None => return fields,
    };
    let mode = match body.get("mode").and_then(Value::as_str).and_then(BodyMode::from_v2) {
        Some(mode) => mode,
        None => return fields,
    };
    let payload = body.get(mode.as_v2_str());

    if mode == BodyMode::Raw && is_default_raw(body, payload) {
        return fields;
    }

    fields.insert("dataMode".to_string(), Value::String(mode.as_v1_str().to_string()));

    match mode {
        BodyMode::Raw => {
            let text = payload.and_then(Value::as_str).unwrap_or_default();
            fields.insert("rawModeData".to_string(), Value::String(text.to_string()));
        }
        BodyMode::Urlencoded | BodyMode::Formdata => {
            let data = objects(payload)
                .map(|pair| {
                    let mut pair = pair.clone();
                    disabled_to_enabled(&mut pair);
                    Value::Object(pair)
                })
                .collect();
            fields.insert("data".to_string(), Value::Array(data));
        }
        BodyMode::File => {
            if let Some(src) = payload
                .and_then(Value::as_object)
                .and_then(|file| file.get("src"))
                .and_then(Value::as_str)
            {
                fields.insert("rawModeData".to_string(), Value::String(src.to_string()));
            }
        }
        BodyMode::Graphql => {
            if let Some(graphql) = payload.filter(|g| g.is_object()) {
                fields.insert("graphqlModeData".to_string(), graphql.clone());
            }
        }
    }

    if let Some(options) = body.get("options").filter(|o| o.is_object()) {
        fields.insert("dataOptions".to_string(), options.clone());
    }
    if body.get("disabled") == Some(&Value::Bool(true)) {
        fields.insert("dataDisabled".to_string(), Value::Bool(true));
    }

    fields
}

fn is_default_raw(body: &Map<String, Value>, payload: Option<&Value>) -> bool {
    let empty_text = payload.and_then(Value::as_str).map_or(true, str::is_empty);
    empty_text && !body.contains_key("options") && body.get("disabled") != Some(&Value::Bool(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_mode_mapping() {
        assert_eq!(BodyMode::from_v1("params"), Some(BodyMode::Formdata));
        assert_eq!(BodyMode::from_v1("binary"), Some(BodyMode::File));
        assert_eq!(BodyMode::from_v1("file"), Some(BodyMode::File));
        assert_eq!(BodyMode::from_v1("nope"), None);
        assert_eq!(BodyMode::Formdata.as_v1_str(), "params");
        assert_eq!(BodyMode::File.as_v1_str(), "binary");
        assert_eq!(BodyMode::from_v2("formdata"), Some(BodyMode::Formdata));
    }

    #[test]
    fn test_default_body_when_mode_missing() {
        assert_eq!(body_from_v1(&request(json!({}))), json!({"mode": "raw", "raw": ""}));
        assert_eq!(
            body_from_v1(&request(json!({"dataMode": "soap", "data": "x"}))),
            default_body()
        );
    }

    #[test]
    fn test_raw_body_sources() {
        assert_eq!(
            body_from_v1(&request(json!({"dataMode": "raw", "data": "akjshgdajhsgd"}))),
            json!({"mode": "raw", "raw": "akjshgdajhsgd"})
        );
        assert_eq!(
            body_from_v1(&request(json!({"dataMode": "raw", "rawModeData": ["{}"], "data": []}))),
            json!({"mode": "raw", "raw": "{}"})
        );
        assert_eq!(
            body_from_v1(&request(json!({"dataMode": "raw", "rawModeData": ["a", "b"]}))),
            json!({"mode": "raw", "raw": ""})
        );
    }

    #[test]
    fn test_params_become_formdata() {
        let body = body_from_v1(&request(json!({
            "dataMode": "params",
            "data": [
                {"key": "a", "value": "1", "type": "text", "enabled": false},
                null,
                {"key": "f", "src": "/tmp/x", "type": "file"}
            ]
        })));

        assert_eq!(
            body,
            json!({
                "mode": "formdata",
                "formdata": [
                    {"key": "a", "value": "1", "type": "string", "disabled": true},
                    {"key": "f", "src": "/tmp/x", "type": "file"}
                ]
            })
        );
    }

    #[test]
    fn test_file_and_options() {
        let body = body_from_v1(&request(json!({
            "dataMode": "binary",
            "rawModeData": "sample.txt",
            "dataOptions": {"raw": {"language": "json"}},
            "dataDisabled": true
        })));

        assert_eq!(
            body,
            json!({
                "mode": "file",
                "file": {"src": "sample.txt"},
                "options": {"raw": {"language": "json"}},
                "disabled": true
            })
        );
    }

    #[test]
    fn test_graphql_body() {
        let body = body_from_v1(&request(json!({
            "dataMode": "graphql",
            "graphqlModeData": {"query": "{ me }", "variables": ""}
        })));
        assert_eq!(body["graphql"], json!({"query": "{ me }", "variables": ""}));
    }

    #[test]
    fn test_default_body_reverses_to_nothing() {
        assert!(body_to_v1(Some(&default_body())).is_empty());
        assert!(body_to_v1(None).is_empty());
        assert!(body_to_v1(Some(&json!({"mode": "unknown"}))).is_empty());
    }

    #[test]
    fn test_formdata_reverse() {
        let fields = body_to_v1(Some(&json!({
            "mode": "formdata",
            "formdata": [{"key": "a", "value": "1", "disabled": true}]
        })));

        assert_eq!(
            Value::Object(fields),
            json!({
                "dataMode": "params",
                "data": [{"key": "a", "value": "1", "enabled": false}]
            })
        );
    }

    #[test]
    fn test_raw_and_file_reverse() {
        let raw = body_to_v1(Some(&json!({"mode": "raw", "raw": "hello"})));
        assert_eq!(Value::Object(raw), json!({"dataMode": "raw", "rawModeData": "hello"}));

        let file = body_to_v1(Some(&json!({"mode": "file", "file": {"src": "a.bin"}})));
        assert_eq!(Value::Object(file), json!({"dataMode": "binary", "rawModeData": "a.bin"}));

        let with_options = body_to_v1(Some(&json!({
            "mode": "raw",
            "raw": "",
            "options": {"raw": {"language": "text"}}
        })));
        assert_eq!(with_options["dataMode"], json!("raw"));
        assert_eq!(with_options["dataOptions"], json!({"raw": {"language": "text"}}));
    }
}
