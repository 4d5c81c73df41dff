//! Header codec
//!
//! v1 requests carry headers as structured `headerData` and, in older
//! exports, as a newline separated `Key: Value` string where a leading `//`
//! marks a disabled header.

use crate::value::{disabled_to_enabled, objects};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

static HEADER_LINE_REGEX: OnceLock<Regex> = OnceLock::new();

fn header_line_regex() -> &'static Regex {
    HEADER_LINE_REGEX.get_or_init(|| {
        Regex::new(r"^\s*(//)?\s*([^:]+?)\s*:\s*(.*?)\s*$").expect("header pattern is valid")
    })
}

/// Parse a legacy header string into v2 header objects
///
/// Lines without a `:` separator are skipped.
pub fn parse_header_string(headers: &str) -> Vec<Value> {
    headers
        .lines()
        .filter_map(|line| {
            let captures = header_line_regex().captures(line)?;

            let mut header = Map::new();
            header.insert("key".to_string(), Value::String(captures[2].to_string()));
            header.insert("value".to_string(), Value::String(captures[3].to_string()));
            if captures.get(1).is_some() {
                header.insert("disabled".to_string(), Value::Bool(true));
            }
            Some(Value::Object(header))
        })
        .collect()
}

/// Serialize v2 header objects into the legacy header string
pub fn header_string(headers: Option<&Value>) -> String {
    objects(headers)
        .filter_map(|header| {
            let key = header.get("key").and_then(Value::as_str)?;
            let value = header.get("value").and_then(Value::as_str).unwrap_or_default();
            let prefix = if header.get("disabled") == Some(&Value::Bool(true)) {
                "// "
            } else {
                ""
            };
            Some(format!("{}{}: {}", prefix, key, value))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build v1 `headerData` from v2 header objects
pub fn header_data(headers: Option<&Value>) -> Vec<Value> {
    objects(headers)
        .map(|header| {
            let mut header = header.clone();
            disabled_to_enabled(&mut header);
            Value::Object(header)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_header_string() {
        let headers = parse_header_string("Content-Type: application/json\n// X-Debug: 1\n\nbroken");
        assert_eq!(
            headers,
            vec![
                json!({"key": "Content-Type", "value": "application/json"}),
                json!({"key": "X-Debug", "value": "1", "disabled": true}),
            ]
        );
    }

    #[test]
    fn test_value_may_contain_colons() {
        let headers = parse_header_string("Date: Fri, 19 May 2017 11:35:14 GMT");
        assert_eq!(headers[0]["value"], json!("Fri, 19 May 2017 11:35:14 GMT"));
    }

    #[test]
    fn test_header_string_and_data() {
        let headers = json!([
            {"key": "Accept", "value": "*/*"},
            {"key": "X-Off", "value": "1", "disabled": true},
            null
        ]);

        assert_eq!(header_string(Some(&headers)), "Accept: */*\n// X-Off: 1");
        assert_eq!(
            header_data(Some(&headers)),
            vec![
                json!({"key": "Accept", "value": "*/*"}),
                json!({"key": "X-Off", "value": "1", "enabled": false}),
            ]
        );
        assert_eq!(header_string(None), "");
    }
}
