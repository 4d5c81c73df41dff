//! Property-based testing strategies for generating test data
//!
//! This module provides proptest strategies for generating query parameters,
//! falsy values and flat v1 collections with shuffled order arrays.

#![cfg(test)]

use crate::codec::QueryParam;
use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;
use serde_json::{json, Value};

/// Strategy for the falsy values that all mean "absent"
pub fn falsy_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(json!(false)),
        Just(json!("")),
        Just(json!(0)),
        Just(json!(0.0)),
    ]
}

/// Strategy for query parameters with bare (`None`), empty and filled values
pub fn query_param_strategy() -> impl Strategy<Value = QueryParam> {
    (
        "[a-z][a-z0-9_]{0,7}",          // key
        option::of("[a-zA-Z0-9.]{0,6}"), // value
    )
        .prop_map(|(key, value)| QueryParam::new(key, value.as_deref()))
}

/// Strategy for request ids and a permutation of them
pub fn shuffled_ids_strategy() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    (1usize..10).prop_flat_map(|count| {
        let ids: Vec<String> = (0..count).map(|i| format!("R{}", i)).collect();
        (Just(ids.clone()), Just(ids).prop_shuffle())
    })
}

/// A flat v1 collection declaring `ids` as requests in the given order and
/// listing them in `order`
pub fn flat_collection(ids: &[String], order: &[String]) -> Value {
    let requests: Vec<Value> = ids
        .iter()
        .map(|id| json!({"id": id, "name": format!("request {}", id), "method": "GET"}))
        .collect();
    json!({
        "id": "C1",
        "name": "generated",
        "requests": requests,
        "order": order
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{parse_query, unparse_query};
    use crate::ids::resolve_id;
    use crate::{convert, ConversionOptions};

    proptest! {
        #[test]
        fn prop_query_string_round_trip(params in vec(query_param_strategy(), 0..8)) {
            let query = unparse_query(&params);
            prop_assert_eq!(parse_query(&query), params);
        }

        #[test]
        fn prop_structured_query_round_trip(param in query_param_strategy()) {
            let v1 = param.to_v1_value();
            let (restored, had_equals) = QueryParam::from_v1(v1.as_object().unwrap());
            prop_assert!(had_equals);
            prop_assert_eq!(restored, param);
        }

        #[test]
        fn prop_root_follows_order_permutation((ids, order) in shuffled_ids_strategy()) {
            let collection = flat_collection(&ids, &order);
            let converted = convert(&collection, &ConversionOptions::new("1.0.0", "2.0.0")).unwrap();

            let produced: Vec<String> = converted["item"]
                .as_array()
                .unwrap()
                .iter()
                .map(|item| item["_postman_id"].as_str().unwrap().to_string())
                .collect();
            prop_assert_eq!(produced, order);
        }

        #[test]
        fn prop_falsy_ids_are_regenerated(id in falsy_value_strategy(), retain in any::<bool>()) {
            let resolved = resolve_id(Some(&id), retain);
            prop_assert_eq!(resolved.len(), 36);
        }
    }
}
