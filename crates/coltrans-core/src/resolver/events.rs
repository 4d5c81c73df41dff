//! Script event resolution
//!
//! Legacy v1 scripts live in the `preRequestScript` and `tests` strings,
//! modern ones in an `events` array shaped like the v2 `event` list.

use super::{resolve, Presence, Resolution};
use crate::value::{join_script, non_empty_str, objects, script_lines};
use serde_json::{json, Map, Value};

const SCRIPT_TYPE: &str = "text/javascript";

/// Resolve the v2 `event` list of a v1 request, folder or collection
///
/// Returns `None` when neither encoding carries a script.
pub fn events_from_v1(entity: &Map<String, Value>, prioritize_v2: bool) -> Option<Value> {
    let test = non_empty_str(entity.get("tests"));
    let prerequest = non_empty_str(entity.get("preRequestScript"));

    let legacy = if test.is_some() || prerequest.is_some() {
        Presence::Usable
    } else {
        Presence::Absent
    };
    let modern = if objects(entity.get("events")).next().is_some() {
        Presence::Usable
    } else {
        Presence::Absent
    };

    match resolve(legacy, modern, prioritize_v2) {
        Resolution::Legacy => {
            let mut events = Vec::new();
            if let Some(script) = test {
                events.push(legacy_event("test", script));
            }
            if let Some(script) = prerequest {
                events.push(legacy_event("prerequest", script));
            }
            Some(Value::Array(events))
        }
        Resolution::Modern => Some(Value::Array(
            objects(entity.get("events"))
                .map(|event| Value::Object(modern_event(event)))
                .collect(),
        )),
        Resolution::Omit => None,
    }
}

fn legacy_event(listen: &str, script: &str) -> Value {
    json!({
        "listen": listen,
        "script": {
            "type": SCRIPT_TYPE,
            "exec": script_lines(script)
        }
    })
}

fn modern_event(event: &Map<String, Value>) -> Map<String, Value> {
    let mut event = event.clone();

    match event.get_mut("script") {
        Some(Value::Object(script)) => {
            script
                .entry("type".to_string())
                .or_insert_with(|| Value::String(SCRIPT_TYPE.to_string()));
        }
        Some(script @ Value::String(_)) => {
            let exec = script_lines(script.as_str().unwrap_or_default());
            *script = json!({ "type": SCRIPT_TYPE, "exec": exec });
        }
        _ => {}
    }

    event
}

/// Build the v1 script fields of a v2 `event` list
///
/// The events are kept as `events`, and the first enabled `prerequest` and
/// `test` scripts are also flattened into `preRequestScript` and `tests`.
pub fn events_to_v1(events: Option<&Value>) -> Map<String, Value> {
    let mut fields = Map::new();

    let list: Vec<Value> = objects(events).cloned().map(Value::Object).collect();
    if list.is_empty() {
        return fields;
    }

    for (listen, key) in [("prerequest", "preRequestScript"), ("test", "tests")] {
        let script = objects(events)
            .filter(|event| event.get("listen").and_then(Value::as_str) == Some(listen))
            .filter(|event| event.get("disabled") != Some(&Value::Bool(true)))
            .find_map(|event| match event.get("script") {
                Some(Value::Object(script)) => join_script(script.get("exec")),
                _ => None,
            });

        if let Some(script) = script {
            fields.insert(key.to_string(), Value::String(script));
        }
    }

    fields.insert("events".to_string(), Value::Array(list));
    fields
}
