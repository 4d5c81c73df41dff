//! JSON helpers shared by every conversion stage
//!
//! The legacy format overloads a whole family of falsy values (`null`, a
//! missing key, `false`, `""`, `0`, `NaN`) to mean "nothing here". All of
//! them are funnelled through [`is_absent`] so no stage makes its own call.

use serde_json::{Map, Value};

/// Whether a value counts as absent
///
/// Missing keys, `null`, `false`, the empty string and numeric zero are all
/// absent. `NaN` cannot be represented in JSON and arrives as `null`.
pub fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(flag)) => !flag,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f == 0.0 || f.is_nan()),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// Negation of [`is_absent`]
pub fn is_present(value: Option<&Value>) -> bool {
    !is_absent(value)
}

/// A non-empty string value
pub fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}

/// Iterate the object members of an array, skipping anything malformed
pub fn objects(value: Option<&Value>) -> impl Iterator<Item = &Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

/// Copy `key` from `source` into `target` when it exists
pub fn copy_field(target: &mut Map<String, Value>, source: &Map<String, Value>, key: &str) {
    if let Some(value) = source.get(key) {
        target.insert(key.to_string(), value.clone());
    }
}

/// Copy `from` in `source` into `to` in `target` when it exists
pub fn rename_field(
    target: &mut Map<String, Value>,
    source: &Map<String, Value>,
    from: &str,
    to: &str,
) {
    if let Some(value) = source.get(from) {
        target.insert(to.to_string(), value.clone());
    }
}

/// Rewrite the `type: "text"` tag of a key/value pair to `"string"`
pub fn normalize_type_tag(pair: &mut Map<String, Value>) {
    if pair.get("type").and_then(Value::as_str) == Some("text") {
        pair.insert("type".to_string(), Value::String("string".to_string()));
    }
}

/// Convert a v1 `enabled: false` flag into the v2 `disabled: true` flag
pub fn enabled_to_disabled(pair: &mut Map<String, Value>) {
    if let Some(enabled) = pair.remove("enabled") {
        if enabled == Value::Bool(false) {
            pair.insert("disabled".to_string(), Value::Bool(true));
        }
    }
}

/// Convert a v2 `disabled: true` flag into the v1 `enabled: false` flag
pub fn disabled_to_enabled(pair: &mut Map<String, Value>) {
    if let Some(disabled) = pair.remove("disabled") {
        if disabled == Value::Bool(true) {
            pair.insert("enabled".to_string(), Value::Bool(false));
        }
    }
}

/// Split a script body into the line array used by `script.exec`
pub fn script_lines(script: &str) -> Vec<Value> {
    script
        .split('\n')
        .map(|line| Value::String(line.to_string()))
        .collect()
}

/// Join a `script.exec` value back into one script body
pub fn join_script(exec: Option<&Value>) -> Option<String> {
    match exec? {
        Value::String(s) => Some(s.clone()),
        Value::Array(lines) => Some(
            lines
                .iter()
                .map(|line| line.as_str().unwrap_or_default())
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_falsy_family_is_absent() {
        for value in [json!(null), json!(false), json!(""), json!(0), json!(0.0)] {
            assert!(is_absent(Some(&value)), "{} should be absent", value);
        }
        assert!(is_absent(None));
    }

    #[test]
    fn test_truthy_values_are_present() {
        for value in [json!(true), json!("x"), json!(1), json!(-2.5), json!([]), json!({})] {
            assert!(is_present(Some(&value)), "{} should be present", value);
        }
    }

    #[test]
    fn test_objects_skips_malformed_members() {
        let value = json!([false, null, {"id": "F1"}, 0, "", [1], {"id": "F2"}]);
        let ids: Vec<_> = objects(Some(&value))
            .map(|o| o["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["F1", "F2"]);
        assert_eq!(objects(Some(&json!("nope"))).count(), 0);
        assert_eq!(objects(None).count(), 0);
    }

    #[test]
    fn test_enabled_disabled_flags() {
        let mut pair = json!({"key": "a", "enabled": false}).as_object().unwrap().clone();
        enabled_to_disabled(&mut pair);
        assert_eq!(Value::Object(pair.clone()), json!({"key": "a", "disabled": true}));

        disabled_to_enabled(&mut pair);
        assert_eq!(Value::Object(pair), json!({"key": "a", "enabled": false}));

        let mut enabled = json!({"key": "b", "enabled": true}).as_object().unwrap().clone();
        enabled_to_disabled(&mut enabled);
        assert_eq!(Value::Object(enabled), json!({"key": "b"}));
    }

    #[test]
    fn test_type_tag_normalization() {
        let mut pair = json!({"key": "a", "type": "text"}).as_object().unwrap().clone();
        normalize_type_tag(&mut pair);
        assert_eq!(pair["type"], json!("string"));

        let mut file = json!({"key": "f", "type": "file"}).as_object().unwrap().clone();
        normalize_type_tag(&mut file);
        assert_eq!(file["type"], json!("file"));
    }

    #[test]
    fn test_script_lines_round_trip() {
        let lines = script_lines("a\nb");
        assert_eq!(lines, vec![json!("a"), json!("b")]);
        assert_eq!(join_script(Some(&Value::Array(lines))).as_deref(), Some("a\nb"));
        assert_eq!(join_script(Some(&json!("single"))).as_deref(), Some("single"));
        assert_eq!(join_script(None), None);
    }
}
