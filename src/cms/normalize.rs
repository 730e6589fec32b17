//! Flattens the two entity shapes the CMS has produced over time.
//!
//! Legacy responses wrap every entity as `{ "id": 1, "attributes": { ... } }`
//! and every relation as `{ "data": ... }`. Newer responses are already flat
//! (`{ "id": 1, "title": ... }`). After [`normalize`] both look like the latter,
//! at every depth.

use serde_json::{Map, Value};

pub fn normalize(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        Value::Object(mut map) => {
            if let Some(inner) = map.remove("data") {
                return normalize(inner);
            }
            if map.get("attributes").is_some_and(Value::is_object) {
                return flatten_entity(map);
            }
            Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, normalize(value)))
                    .collect(),
            )
        }
        primitive => primitive,
    }
}

fn flatten_entity(mut map: Map<String, Value>) -> Value {
    let mut out = Map::new();
    if let Some(id) = map.remove("id") {
        out.insert("id".to_string(), id);
    }
    if let Some(Value::Object(attributes)) = map.remove("attributes") {
        for (key, value) in attributes {
            out.insert(key, normalize(value));
        }
    }
    Value::Object(out)
}
