//! GraphSON normalization
//!
//! Gremlin servers answer in GraphSON. Version 1 is plain JSON; versions 2
//! and 3 wrap values as `{"@type": "g:Int64", "@value": 42}`. Everything
//! above the client works on plain JSON, so responses are untyped here.

use serde_json::{Map, Value};

use crate::models::Row;

const TYPE_KEY: &str = "@type";
const VALUE_KEY: &str = "@value";

/// Strip GraphSON v2/v3 type wrappers, recursively.
///
/// Untyped (v1) input is returned unchanged.
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        Value::Object(mut map) => {
            let ty = match map.get(TYPE_KEY) {
                Some(Value::String(ty)) if map.contains_key(VALUE_KEY) => Some(ty.clone()),
                _ => None,
            };
            if let Some(ty) = ty {
                let inner = map.remove(VALUE_KEY).unwrap_or(Value::Null);
                return decode_typed(&ty, inner);
            }
            Value::Object(map.into_iter().map(|(k, v)| (k, normalize(v))).collect())
        }
        other => other,
    }
}

fn decode_typed(ty: &str, inner: Value) -> Value {
    match ty {
        "g:Map" => match inner {
            Value::Array(flat) => decode_map(flat),
            other => normalize(other),
        },
        "g:BulkSet" => match inner {
            Value::Array(flat) => decode_bulk_set(flat),
            other => normalize(other),
        },
        // Elements that only matter for their value
        "g:VertexProperty" | "g:Property" | "g:Traverser" => match inner {
            Value::Object(mut fields) => fields
                .remove("value")
                .map(normalize)
                .unwrap_or(Value::Null),
            other => normalize(other),
        },
        // g:List, g:Set, numerics, g:UUID, g:T, g:Direction, g:Vertex, g:Edge, g:Path ...
        _ => normalize(inner),
    }
}

/// `g:Map` is a flat `[k1, v1, k2, v2, ...]` list; keys may be any type
fn decode_map(flat: Vec<Value>) -> Value {
    let mut map = Map::new();
    let mut items = flat.into_iter();
    while let Some(key) = items.next() {
        let value = items.next().map(normalize).unwrap_or(Value::Null);
        map.insert(key_string(normalize(key)), value);
    }
    Value::Object(map)
}

/// `g:BulkSet` is a flat `[v1, n1, v2, n2, ...]` list of value and multiplicity
fn decode_bulk_set(flat: Vec<Value>) -> Value {
    let mut out = Vec::new();
    let mut items = flat.into_iter();
    while let Some(value) = items.next() {
        let bulk = items
            .next()
            .map(normalize)
            .and_then(|b| b.as_u64())
            .unwrap_or(1);
        let value = normalize(value);
        for _ in 0..bulk {
            out.push(value.clone());
        }
    }
    Value::Array(out)
}

fn key_string(key: Value) -> String {
    match key {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Normalize a response's `result.data` into a list of result values.
///
/// `null` (a `204 No Content` response) yields no values; a bare scalar
/// yields one.
pub fn result_values(data: Value) -> Vec<Value> {
    match normalize(data) {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Collapse single-element lists into their element, recursively.
///
/// `valueMap()` returns every property as a list because vertex properties
/// may be multi-valued; the demo dataset never uses that.
pub fn flatten(value: Value) -> Value {
    match value {
        Value::Array(mut items) if items.len() == 1 => flatten(items.remove(0)),
        Value::Array(items) => Value::Array(items.into_iter().map(flatten).collect()),
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, flatten(v))).collect()),
        other => other,
    }
}

/// Turn normalized result values into rows.
///
/// Maps become rows with their values flattened; any other value becomes a
/// single-column row keyed `value`.
pub fn rows(values: Vec<Value>) -> Vec<Row> {
    values
        .into_iter()
        .map(|value| match flatten(value) {
            Value::Object(map) => map.into_iter().collect(),
            other => {
                let mut row = Row::new();
                row.insert("value".to_string(), other);
                row
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_untyped_passes_through() {
        let v = json!([{"name": ["Alice"], "age": [28]}]);
        assert_eq!(normalize(v.clone()), v);
    }

    #[test]
    fn test_typed_list_of_maps() {
        let v = json!({
            "@type": "g:List",
            "@value": [{
                "@type": "g:Map",
                "@value": [
                    "name", {"@type": "g:List", "@value": ["Laptop"]},
                    "price", {"@type": "g:List", "@value": [{"@type": "g:Double", "@value": 999.99}]}
                ]
            }]
        });
        assert_eq!(
            normalize(v),
            json!([{"name": ["Laptop"], "price": [999.99]}])
        );
    }

    #[test]
    fn test_map_with_token_keys() {
        let v = json!({
            "@type": "g:Map",
            "@value": [
                {"@type": "g:T", "@value": "id"}, {"@type": "g:Int64", "@value": 7},
                {"@type": "g:T", "@value": "label"}, "user"
            ]
        });
        assert_eq!(normalize(v), json!({"id": 7, "label": "user"}));
    }

    #[test]
    fn test_non_string_map_key_is_stringified() {
        let v = json!({"@type": "g:Map", "@value": [{"@type": "g:Int32", "@value": 5}, "five"]});
        assert_eq!(normalize(v), json!({"5": "five"}));
    }

    #[test]
    fn test_bulk_set_expands_multiplicity() {
        let v = json!({
            "@type": "g:BulkSet",
            "@value": ["a", {"@type": "g:Int64", "@value": 2}, "b", {"@type": "g:Int64", "@value": 1}]
        });
        assert_eq!(normalize(v), json!(["a", "a", "b"]));
    }

    #[test]
    fn test_vertex_properties_reduce_to_values() {
        let v = json!({
            "@type": "g:Vertex",
            "@value": {
                "id": {"@type": "g:Int64", "@value": 1},
                "label": "user",
                "properties": {
                    "name": [{
                        "@type": "g:VertexProperty",
                        "@value": {"id": {"@type": "g:Int64", "@value": 2}, "value": "Alice", "label": "name"}
                    }]
                }
            }
        });
        assert_eq!(
            normalize(v),
            json!({"id": 1, "label": "user", "properties": {"name": ["Alice"]}})
        );
    }

    #[test]
    fn test_edge_property_reduces_to_value() {
        let v = json!({"@type": "g:Property", "@value": {"key": "rating", "value": {"@type": "g:Int32", "@value": 5}}});
        assert_eq!(normalize(v), json!(5));
    }

    #[test]
    fn test_result_values_shapes() {
        assert!(result_values(Value::Null).is_empty());
        assert_eq!(
            result_values(json!({"@type": "g:List", "@value": [{"@type": "g:Int64", "@value": 11}]})),
            vec![json!(11)]
        );
        assert_eq!(result_values(json!("done")), vec![json!("done")]);
    }

    #[test]
    fn test_rows_flatten_value_maps() {
        let rows = rows(vec![
            json!({"product": {"name": ["Laptop"]}, "purchaseCount": 2}),
            json!(11),
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["product"], json!({"name": "Laptop"}));
        assert_eq!(rows[0]["purchaseCount"], json!(2));
        assert_eq!(rows[1]["value"], json!(11));
    }

    #[test]
    fn test_flatten_keeps_multi_element_lists() {
        assert_eq!(flatten(json!([["a"], "b"])), json!(["a", "b"]));
    }
}
