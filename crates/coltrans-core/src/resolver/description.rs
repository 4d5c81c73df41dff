//! Description handling
//!
//! Falsy descriptions are dropped unless `retainEmptyValues` is set, in which
//! case every description-bearing entity carries `description: null` instead.

use crate::value::is_absent;
use serde_json::{Map, Value};

const DESCRIPTION: &str = "description";

/// How empty descriptions are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DescriptionPolicy {
    retain_empty: bool,
}

impl DescriptionPolicy {
    pub fn new(retain_empty: bool) -> Self {
        Self { retain_empty }
    }

    pub fn retains_empty(&self) -> bool {
        self.retain_empty
    }

    /// The description to write for `source`, or `None` to write nothing
    pub fn resolve(&self, source: Option<&Value>) -> Option<Value> {
        if !is_absent(source) {
            return source.cloned();
        }
        self.retain_empty.then_some(Value::Null)
    }

    /// Write the resolved description of `source` into `target`
    pub fn apply(&self, target: &mut Map<String, Value>, source: Option<&Value>) {
        match self.resolve(source) {
            Some(description) => {
                target.insert(DESCRIPTION.to_string(), description);
            }
            None => {
                target.remove(DESCRIPTION);
            }
        }
    }

    /// Rewrite the description of a pair in place
    pub fn clean(&self, pair: &mut Map<String, Value>) {
        let source = pair.get(DESCRIPTION).cloned();
        self.apply(pair, source.as_ref());
    }

    /// Rewrite the descriptions of every object in a pair list
    pub fn clean_all(&self, pairs: &mut Value) {
        if let Value::Array(items) = pairs {
            for pair in items.iter_mut().filter_map(Value::as_object_mut) {
                self.clean(pair);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_present_description_kept() {
        let policy = DescriptionPolicy::new(false);
        assert_eq!(policy.resolve(Some(&json!("text"))), Some(json!("text")));

        let rich = json!({"content": "text", "type": "text/markdown"});
        assert_eq!(policy.resolve(Some(&rich)), Some(rich.clone()));
    }

    #[test]
    fn test_empty_description_dropped() {
        let policy = DescriptionPolicy::new(false);
        for empty in [json!(""), json!(null), json!(false), json!(0)] {
            assert_eq!(policy.resolve(Some(&empty)), None);
        }
        assert_eq!(policy.resolve(None), None);
    }

    #[test]
    fn test_empty_description_retained_as_null() {
        let policy = DescriptionPolicy::new(true);
        assert_eq!(policy.resolve(Some(&json!(""))), Some(Value::Null));
        assert_eq!(policy.resolve(None), Some(Value::Null));
    }

    #[test]
    fn test_clean_all_pairs() {
        let mut pairs = json!([
            {"key": "a", "description": ""},
            {"key": "b", "description": "kept"},
            {"key": "c"},
            null
        ]);

        DescriptionPolicy::new(false).clean_all(&mut pairs);
        assert_eq!(
            pairs,
            json!([{"key": "a"}, {"key": "b", "description": "kept"}, {"key": "c"}, null])
        );

        DescriptionPolicy::new(true).clean_all(&mut pairs);
        assert_eq!(
            pairs,
            json!([
                {"key": "a", "description": null},
                {"key": "b", "description": "kept"},
                {"key": "c", "description": null},
                null
            ])
        );
    }
}
