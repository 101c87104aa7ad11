//! Expose a parsed JSON document as host objects.
//!
//! Objects become records whose fields carry their original key as a
//! `json` tag, so `doc.some_key` resolves by tag even when the native
//! field name had to be adjusted. Arrays become sequences.

use std::rc::Rc;

use fsq_eval::objects::{DynRecord, VecSequence};
use fsq_eval::{FieldInfo, Value};
use serde_json::Value as Json;

/// Convert a JSON value.
pub fn to_value(json: &Json) -> Value {
    match json {
        Json::Null => Value::Invalid,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => Value::String(s.clone()),
        Json::Array(items) => Value::Sequence(Rc::new(VecSequence::new(
            "[]any",
            items.iter().map(to_value).collect(),
        ))),
        Json::Object(entries) => {
            let record = entries.iter().fold(DynRecord::new("object"), |rec, (key, v)| {
                let info = FieldInfo::new(field_name(key)).with_tag("json", key.as_str());
                rec.with_field(info, to_value(v))
            });
            record.into_value()
        }
    }
}

/// Native field name for a JSON key: non-identifier characters become `_`.
fn field_name(key: &str) -> String {
    let name: String = key
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsq_eval::{EvalConfig, Evaluator};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn evaluator(doc: Json) -> Evaluator {
        let mut ev = Evaluator::with_config(EvalConfig::default().with_display_tag("json"));
        ev.bind("doc", to_value(&doc)).unwrap();
        ev
    }

    #[test]
    fn test_field_names() {
        assert_eq!(field_name("plain"), "plain");
        assert_eq!(field_name("with-dash"), "with_dash");
        assert_eq!(field_name("1st"), "_1st");
        assert_eq!(field_name(""), "_");
    }

    #[test]
    fn test_document_access() {
        let mut ev = evaluator(json!({
            "station": "wettzell",
            "with-dash": 7,
            "scans": [{"id": 1}, {"id": 2}],
            "gain": 1.5
        }));
        let get = |ev: &mut Evaluator, src: &str| ev.eval(src).and_then(|v| v.load()).unwrap();
        assert_eq!(get(&mut ev, "doc.station"), Value::from("wettzell"));
        assert_eq!(get(&mut ev, "doc.with_dash"), Value::Int(7));
        assert_eq!(get(&mut ev, "doc.scans[1].id"), Value::Int(2));
        assert_eq!(get(&mut ev, "doc.gain * 2").to_string(), "3");
    }
}
