//! Rendering of evaluator values as JSON.

use fsq_eval::{Number, Value};
use serde_json::{json, Map, Value as Json};

/// Nesting beyond which objects are summarised instead of expanded.
const MAX_DEPTH: usize = 8;

/// Pretty JSON text for a value; `None` for values that print nothing.
pub fn to_pretty(value: &Value, tag: Option<&str>) -> Option<String> {
    let json = to_json(value, tag)?;
    // Plain strings print unquoted.
    if let Json::String(s) = &json {
        return Some(s.clone());
    }
    serde_json::to_string_pretty(&json).ok()
}

/// Convert a value to JSON. Places are loaded; `Invalid` yields `None`.
///
/// With a display tag, record fields are keyed by their tagged name when
/// they have one.
pub fn to_json(value: &Value, tag: Option<&str>) -> Option<Json> {
    convert(value, tag, 0)
}

fn convert(value: &Value, tag: Option<&str>, depth: usize) -> Option<Json> {
    let value = match value.load() {
        Ok(v) => v,
        Err(e) => return Some(Json::String(format!("<{e}>"))),
    };
    if depth > MAX_DEPTH {
        return Some(Json::String(value.to_string()));
    }
    Some(match &value {
        Value::Invalid => return None,
        Value::Bool(b) => json!(b),
        Value::Int(i) => json!(i),
        Value::Float(x) => json!(x),
        Value::String(s) => json!(s),
        Value::Constant(n) => constant(n),
        Value::Function(f) => Json::String(f.to_string()),
        Value::Sequence(seq) => match seq.bytes() {
            Some(bytes) => json!(bytes),
            None => Json::Array(
                (0..seq.len())
                    .filter_map(|i| seq.get(i))
                    .map(|v| convert(&v, tag, depth + 1).unwrap_or(Json::Null))
                    .collect(),
            ),
        },
        Value::Record(record) => {
            let mut map = Map::new();
            for field in record.fields() {
                if let Some(v) = record.field(&field.name) {
                    let rendered = convert(&v, tag, depth + 1).unwrap_or(Json::Null);
                    let key = tag
                        .and_then(|key| field.tagged_name(key))
                        .unwrap_or(field.name.as_str())
                        .to_string();
                    map.insert(key, rendered);
                }
            }
            Json::Object(map)
        }
        Value::Mapping(mapping) => {
            let mut map = Map::new();
            for key in mapping.keys() {
                let rendered = mapping
                    .get(&key)
                    .and_then(|v| convert(&v, tag, depth + 1))
                    .unwrap_or(Json::Null);
                map.insert(key.to_string(), rendered);
            }
            Json::Object(map)
        }
        Value::List(items) => Json::Array(
            items
                .iter()
                .map(|v| convert(v, tag, depth + 1).unwrap_or(Json::Null))
                .collect(),
        ),
        Value::Ref(_) => Json::Null,
    })
}

/// Constants render as the nearest JSON scalar.
fn constant(n: &Number) -> Json {
    match n {
        Number::Bool(b) => json!(b),
        Number::String(s) => json!(s),
        Number::Int(_) | Number::Float(_) => {
            let text = n.to_string();
            serde_json::from_str::<Json>(&text).unwrap_or(Json::String(text))
        }
    }
}
