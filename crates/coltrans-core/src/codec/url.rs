//! URL codec
//!
//! Maps between a raw URL string and its structured form (protocol, host
//! segments, port, path segments, query pairs, hash, path variables). Parsing
//! never fails; unrecognisable input degrades to a structure carrying little
//! more than `raw`.
//!
//! Copyright (c) 2025 Coltrans Team
//! Licensed under the Apache-2.0 license

use crate::value::{
    disabled_to_enabled, enabled_to_disabled, is_present, normalize_type_tag, objects,
};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

static PROTOCOL_REGEX: OnceLock<Regex> = OnceLock::new();

fn protocol_regex() -> &'static Regex {
    PROTOCOL_REGEX.get_or_init(|| {
        Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*|\{\{[^{}]+\}\})://")
            .expect("protocol pattern is valid")
    })
}

/// One query parameter
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryParam {
    /// Parameter name; `None` when the source carried no usable key
    pub key: Option<String>,

    /// `None` renders as a bare key, `Some("")` as `key=`
    pub value: Option<String>,

    /// Remaining per-parameter fields (`description`, `disabled`, ...)
    pub extra: Map<String, Value>,
}

impl QueryParam {
    pub fn new(key: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            key: Some(key.into()),
            value: value.map(str::to_string),
            extra: Map::new(),
        }
    }

    /// Whether the parameter is switched off
    pub fn is_disabled(&self) -> bool {
        self.extra.get("disabled") == Some(&Value::Bool(true))
    }

    /// Build a parameter from a structured v1 `queryParams` entry
    ///
    /// Returns the parameter and whether an `equals` flag was present. The
    /// flag decides the empty/null form of the value: `equals: true` forces a
    /// `null` value to `""`, `equals: false` forces `""` to `null`.
    pub fn from_v1(pair: &Map<String, Value>) -> (Self, bool) {
        let mut extra = pair.clone();
        let key = extra.remove("key").as_ref().and_then(scalar_to_string);
        let mut value = extra.remove("value").as_ref().and_then(scalar_to_string);
        enabled_to_disabled(&mut extra);
        normalize_type_tag(&mut extra);

        let had_equals = match extra.remove("equals") {
            Some(equals) => {
                if is_present(Some(&equals)) {
                    value.get_or_insert_with(String::new);
                } else if value.as_deref() == Some("") {
                    value = None;
                }
                true
            }
            None => false,
        };

        (Self { key, value, extra }, had_equals)
    }

    /// Build a parameter from a v2 `url.query` entry
    pub fn from_v2(pair: &Map<String, Value>) -> Self {
        let mut extra = pair.clone();
        let key = extra.remove("key").as_ref().and_then(scalar_to_string);
        let value = extra.remove("value").as_ref().and_then(scalar_to_string);
        Self { key, value, extra }
    }

    /// The v2 `{key, value, ...}` object
    pub fn to_value(&self) -> Value {
        let mut pair = Map::new();
        pair.insert("key".to_string(), opt_string(&self.key));
        pair.insert("value".to_string(), opt_string(&self.value));
        pair.extend(self.extra.clone());
        Value::Object(pair)
    }

    /// The v1 `{key, value, equals, ...}` object
    pub fn to_v1_value(&self) -> Value {
        let mut pair = Map::new();
        pair.insert("key".to_string(), opt_string(&self.key));
        pair.insert("value".to_string(), opt_string(&self.value));
        pair.insert("equals".to_string(), Value::Bool(self.value.is_some()));
        let mut extra = self.extra.clone();
        disabled_to_enabled(&mut extra);
        pair.extend(extra);
        Value::Object(pair)
    }

    fn to_fragment(&self) -> String {
        let key = self.key.as_deref().unwrap_or_default();
        match &self.value {
            Some(value) => format!("{}={}", key, value),
            None => key.to_string(),
        }
    }
}

/// Structured URL
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedUrl {
    pub raw: String,
    pub protocol: Option<String>,
    /// `user:password` section, kept only so `unparse` can restore it
    pub userinfo: Option<String>,
    pub host: Vec<String>,
    pub port: Option<String>,
    pub path: Vec<String>,
    pub query: Vec<QueryParam>,
    pub hash: Option<String>,
    pub variable: Vec<Value>,
}

impl ParsedUrl {
    /// Whether any query or path variable data is attached
    pub fn has_params(&self) -> bool {
        !self.query.is_empty() || !self.variable.is_empty()
    }

    /// Rebuild the URL string from the structured parts
    ///
    /// Disabled query parameters are left out.
    pub fn unparse(&self) -> String {
        let mut out = String::new();

        if let Some(protocol) = &self.protocol {
            out.push_str(protocol);
            out.push_str("://");
        }
        if let Some(userinfo) = &self.userinfo {
            out.push_str(userinfo);
            out.push('@');
        }
        out.push_str(&self.host.join("."));
        if let Some(port) = &self.port {
            out.push(':');
            out.push_str(port);
        }
        if !self.path.is_empty() {
            out.push('/');
            out.push_str(&self.path.join("/"));
        }
        let query = unparse_query(&self.query);
        if !query.is_empty() {
            out.push('?');
            out.push_str(&query);
        }
        if let Some(hash) = &self.hash {
            out.push('#');
            out.push_str(hash);
        }

        out
    }

    /// The v2 structured `url` object
    pub fn to_value(&self) -> Value {
        let mut url = Map::new();
        url.insert("raw".to_string(), Value::String(self.raw.clone()));
        if let Some(protocol) = &self.protocol {
            url.insert("protocol".to_string(), Value::String(protocol.clone()));
        }
        if !self.host.is_empty() {
            url.insert("host".to_string(), string_array(&self.host));
        }
        if let Some(port) = &self.port {
            url.insert("port".to_string(), Value::String(port.clone()));
        }
        if !self.path.is_empty() {
            url.insert("path".to_string(), string_array(&self.path));
        }
        if !self.query.is_empty() {
            url.insert(
                "query".to_string(),
                Value::Array(self.query.iter().map(QueryParam::to_value).collect()),
            );
        }
        if let Some(hash) = &self.hash {
            url.insert("hash".to_string(), Value::String(hash.clone()));
        }
        if !self.variable.is_empty() {
            url.insert("variable".to_string(), Value::Array(self.variable.clone()));
        }
        Value::Object(url)
    }

    /// Read a v2 structured `url` object back into parts
    ///
    /// Host and path may be arrays or plain strings; path segments may be
    /// objects carrying a `value`. A missing `raw` is rebuilt from the parts.
    pub fn from_v2(url: &Map<String, Value>) -> Self {
        let protocol = url.get("protocol").and_then(scalar_to_string);
        let host = segments(url.get("host"), '.');
        let port = url.get("port").and_then(scalar_to_string);
        let path = segments(url.get("path"), '/');
        let query = objects(url.get("query")).map(QueryParam::from_v2).collect();
        let hash = url.get("hash").and_then(scalar_to_string);
        let variable = url
            .get("variable")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut parsed = Self {
            raw: String::new(),
            protocol,
            userinfo: None,
            host,
            port,
            path,
            query,
            hash,
            variable,
        };
        parsed.raw = match url.get("raw").and_then(Value::as_str) {
            Some(raw) => raw.to_string(),
            None => parsed.unparse(),
        };
        parsed
    }
}

/// Parse a raw URL string
pub fn parse(raw: &str) -> ParsedUrl {
    let mut parsed = ParsedUrl {
        raw: raw.to_string(),
        ..ParsedUrl::default()
    };

    let mut rest = raw.trim_start();

    if let Some((before, hash)) = rest.split_once('#') {
        parsed.hash = Some(hash.to_string());
        rest = before;
    }
    if let Some((before, query)) = rest.split_once('?') {
        parsed.query = parse_query(query);
        rest = before;
    }
    if let Some(captures) = protocol_regex().captures(rest) {
        parsed.protocol = Some(captures[1].to_string());
        rest = &rest[captures[0].len()..];
    }

    let (mut authority, path) = match rest.split_once('/') {
        Some((authority, path)) => (authority, Some(path)),
        None => (rest, None),
    };

    if let Some((userinfo, host)) = authority.rsplit_once('@') {
        parsed.userinfo = Some(userinfo.to_string());
        authority = host;
    }
    if let Some((host, port)) = authority.rsplit_once(':') {
        if is_port(port) {
            parsed.port = Some(port.to_string());
            authority = host;
        }
    }
    if !authority.is_empty() {
        parsed.host = authority.split('.').map(str::to_string).collect();
    }
    if let Some(path) = path {
        parsed.path = path.split('/').map(str::to_string).collect();
    }

    parsed
}

/// Parse a query string (without the leading `?`)
///
/// A segment without `=` yields a `None` value; `key=` yields `Some("")`.
/// Duplicate keys are kept in encounter order.
pub fn parse_query(query: &str) -> Vec<QueryParam> {
    query
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((key, value)) => QueryParam::new(key, Some(value)),
            None => QueryParam::new(segment, None),
        })
        .collect()
}

/// Serialize query parameters, skipping disabled ones
pub fn unparse_query(params: &[QueryParam]) -> String {
    params
        .iter()
        .filter(|param| !param.is_disabled())
        .map(QueryParam::to_fragment)
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the v2 `url` of a v1 request
///
/// Structured `queryParams` replace any query parsed from the raw string;
/// when at least one carried an `equals` flag the raw string is regenerated.
/// The result is an object only when query or path variable data exists, a
/// plain string otherwise, and `None` when the request has no URL at all.
pub fn url_from_v1(request: &Map<String, Value>) -> Option<Value> {
    let raw = match request.get("url") {
        Some(Value::String(raw)) => Some(raw.clone()),
        Some(Value::Object(url)) => url.get("raw").and_then(Value::as_str).map(str::to_string),
        _ => None,
    };
    let mut parsed = parse(raw.as_deref().unwrap_or_default());

    let mut altered = false;
    let structured: Vec<QueryParam> = objects(request.get("queryParams"))
        .map(|pair| {
            let (param, had_equals) = QueryParam::from_v1(pair);
            altered |= had_equals;
            param
        })
        .collect();
    if !structured.is_empty() {
        parsed.query = structured;
    }

    parsed.variable = path_variables_from_v1(request);

    if altered {
        parsed.raw = parsed.unparse();
    }

    if parsed.has_params() {
        Some(parsed.to_value())
    } else {
        raw.filter(|raw| !raw.is_empty()).map(Value::String)
    }
}

fn path_variables_from_v1(request: &Map<String, Value>) -> Vec<Value> {
    let data: Vec<Value> = objects(request.get("pathVariableData"))
        .map(|pair| {
            let mut pair = pair.clone();
            enabled_to_disabled(&mut pair);
            normalize_type_tag(&mut pair);
            Value::Object(pair)
        })
        .collect();
    if !data.is_empty() {
        return data;
    }

    request
        .get("pathVariables")
        .and_then(Value::as_object)
        .map(|variables| {
            variables
                .iter()
                .map(|(key, value)| {
                    let mut pair = Map::new();
                    pair.insert("key".to_string(), Value::String(key.clone()));
                    pair.insert("value".to_string(), value.clone());
                    Value::Object(pair)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// URL fields of a v1 request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct V1Url {
    pub url: String,
    pub query_params: Vec<Value>,
    pub path_variable_data: Vec<Value>,
}

/// Split a v2 `url` (string or object) into v1 request fields
pub fn url_to_v1(url: Option<&Value>) -> Option<V1Url> {
    let parsed = match url? {
        Value::String(raw) => parse(raw),
        Value::Object(url) => ParsedUrl::from_v2(url),
        _ => return None,
    };

    let path_variable_data = parsed
        .variable
        .iter()
        .filter_map(Value::as_object)
        .map(|pair| {
            let mut pair = pair.clone();
            disabled_to_enabled(&mut pair);
            Value::Object(pair)
        })
        .collect();

    Some(V1Url {
        query_params: parsed.query.iter().map(QueryParam::to_v1_value).collect(),
        url: parsed.raw,
        path_variable_data,
    })
}

fn is_port(candidate: &str) -> bool {
    !candidate.is_empty()
        && (candidate.chars().all(|c| c.is_ascii_digit())
            || (candidate.starts_with("{{") && candidate.ends_with("}}")))
}

fn segments(value: Option<&Value>, separator: char) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s
            .trim_start_matches(separator)
            .split(separator)
            .map(str::to_string)
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(segment) => segment.get("value").and_then(scalar_to_string),
                other => scalar_to_string(other),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn opt_string(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

fn string_array(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_full_url() {
        let parsed = parse("https://user:pw@postman-echo.com:8080/get/items?a=1&b#frag");
        assert_eq!(parsed.protocol.as_deref(), Some("https"));
        assert_eq!(parsed.userinfo.as_deref(), Some("user:pw"));
        assert_eq!(parsed.host, vec!["postman-echo", "com"]);
        assert_eq!(parsed.port.as_deref(), Some("8080"));
        assert_eq!(parsed.path, vec!["get", "items"]);
        assert_eq!(
            parsed.query,
            vec![QueryParam::new("a", Some("1")), QueryParam::new("b", None)]
        );
        assert_eq!(parsed.hash.as_deref(), Some("frag"));
        assert_eq!(parsed.unparse(), parsed.raw);
    }

    #[test]
    fn test_parse_variable_host_without_protocol() {
        let parsed = parse("{{baseUrl}}/users/:id");
        assert_eq!(parsed.protocol, None);
        assert_eq!(parsed.host, vec!["{{baseUrl}}"]);
        assert_eq!(parsed.path, vec!["users", ":id"]);
    }

    #[test]
    fn test_parse_empty_and_garbage() {
        let empty = parse("");
        assert_eq!(empty, ParsedUrl::default());

        let garbage = parse("::??##");
        assert_eq!(garbage.raw, "::??##");
        assert!(garbage.path.is_empty());
    }

    #[test]
    fn test_query_without_path_has_no_slash() {
        let parsed = parse("https://foo.com?alpha&beta=");
        assert!(parsed.path.is_empty());
        assert_eq!(parsed.unparse(), "https://foo.com?alpha&beta=");
    }

    #[test]
    fn test_query_equals_table() {
        let cases = [
            (json!({"key": "k", "value": null, "equals": false}), "k", None),
            (json!({"key": "k", "value": null, "equals": true}), "k=", Some("")),
            (json!({"key": "k", "value": null}), "k", None),
            (json!({"key": "k", "value": "", "equals": false}), "k", None),
            (json!({"key": "k", "value": "", "equals": true}), "k=", Some("")),
            (json!({"key": "k", "value": ""}), "k=", Some("")),
        ];

        for (input, expected_raw, expected_value) in cases {
            let (param, _) = QueryParam::from_v1(input.as_object().unwrap());
            let raw = unparse_query(std::slice::from_ref(&param));
            assert_eq!(raw, expected_raw, "serializing {}", input);

            let reparsed = parse_query(&raw);
            assert_eq!(reparsed.len(), 1);
            assert_eq!(reparsed[0].value.as_deref(), expected_value, "parsing {}", raw);
        }
    }

    #[test]
    fn test_duplicate_keys_preserved() {
        let params = parse_query("gamma&gamma=&gamma=1");
        assert_eq!(params.len(), 3);
        assert!(params.iter().all(|p| p.key.as_deref() == Some("gamma")));
        assert_eq!(unparse_query(&params), "gamma&gamma=&gamma=1");
    }

    #[test]
    fn test_disabled_params_skipped_in_raw() {
        let (param, _) = QueryParam::from_v1(
            json!({"key": "off", "value": "1", "enabled": false}).as_object().unwrap(),
        );
        assert!(param.is_disabled());
        let on = QueryParam::new("on", Some("2"));
        assert_eq!(unparse_query(&[param, on]), "on=2");
    }

    #[test]
    fn test_url_from_v1_regenerates_raw() {
        let req = request(json!({
            "url": "https://postman-echo.com/get?alpha&beta&gamma&delta=&epsilon=&gamma=",
            "queryParams": [
                {"key": "alpha", "value": null, "equals": false},
                {"key": "beta", "value": null, "equals": true},
                {"key": "gamma", "value": null},
                {"key": "delta", "value": "", "equals": false},
                {"key": "epsilon", "value": "", "equals": true},
                {"key": "gamma", "value": ""}
            ]
        }));

        assert_eq!(
            url_from_v1(&req).unwrap(),
            json!({
                "raw": "https://postman-echo.com/get?alpha&beta=&gamma&delta&epsilon=&gamma=",
                "protocol": "https",
                "host": ["postman-echo", "com"],
                "path": ["get"],
                "query": [
                    {"key": "alpha", "value": null},
                    {"key": "beta", "value": ""},
                    {"key": "gamma", "value": null},
                    {"key": "delta", "value": null},
                    {"key": "epsilon", "value": ""},
                    {"key": "gamma", "value": ""}
                ]
            })
        );
    }

    #[test]
    fn test_url_from_v1_keeps_raw_without_equals() {
        let req = request(json!({
            "queryParams": [{"key": "query_foo", "value": "query_bar"}],
            "pathVariableData": [{"key": "pv_foo", "value": "pv_bar"}]
        }));

        assert_eq!(
            url_from_v1(&req).unwrap(),
            json!({
                "raw": "",
                "query": [{"key": "query_foo", "value": "query_bar"}],
                "variable": [{"key": "pv_foo", "value": "pv_bar"}]
            })
        );
    }

    #[test]
    fn test_url_from_v1_normalizes_text_type() {
        let req = request(json!({
            "url": "https://a.com/:id?q=1",
            "queryParams": [{"key": "q", "value": "1", "type": "text"}],
            "pathVariableData": [{"key": "id", "value": "1", "type": "text"}]
        }));

        let url = url_from_v1(&req).unwrap();
        assert_eq!(url["query"], json!([{"key": "q", "value": "1", "type": "string"}]));
        assert_eq!(url["variable"], json!([{"key": "id", "value": "1", "type": "string"}]));
    }

    #[test]
    fn test_url_from_v1_plain_string() {
        let req = request(json!({"url": "https://example.com/a"}));
        assert_eq!(url_from_v1(&req), Some(json!("https://example.com/a")));
        assert_eq!(url_from_v1(&request(json!({}))), None);
    }

    #[test]
    fn test_url_from_v1_legacy_path_variables() {
        let req = request(json!({
            "url": "https://example.com/:id",
            "pathVariables": {"id": "42"}
        }));
        let url = url_from_v1(&req).unwrap();
        assert_eq!(url["variable"], json!([{"key": "id", "value": "42"}]));
        assert_eq!(url["raw"], json!("https://example.com/:id"));
    }

    #[test]
    fn test_url_to_v1_from_object() {
        let v1 = url_to_v1(Some(&json!({
            "protocol": "https",
            "host": ["foo", "com"],
            "path": "/a/b",
            "query": [
                {"key": "alpha", "value": null},
                {"key": "beta", "value": "", "disabled": true}
            ],
            "variable": [{"key": "id", "value": "1", "disabled": true}]
        })))
        .unwrap();

        assert_eq!(v1.url, "https://foo.com/a/b?alpha");
        assert_eq!(
            v1.query_params,
            vec![
                json!({"key": "alpha", "value": null, "equals": false}),
                json!({"key": "beta", "value": "", "equals": true, "enabled": false})
            ]
        );
        assert_eq!(
            v1.path_variable_data,
            vec![json!({"key": "id", "value": "1", "enabled": false})]
        );
    }

    #[test]
    fn test_url_to_v1_from_string() {
        let v1 = url_to_v1(Some(&json!("https://foo.com?a=1&b"))).unwrap();
        assert_eq!(v1.url, "https://foo.com?a=1&b");
        assert_eq!(v1.query_params.len(), 2);
        assert_eq!(url_to_v1(None), None);
        assert_eq!(url_to_v1(Some(&json!(42))), None);
    }
}
