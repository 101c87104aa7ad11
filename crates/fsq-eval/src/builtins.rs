//! The `ls` and `str` builtins.

use std::rc::Rc;

use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::objects::VecSequence;
use crate::value::Value;

/// `ls()` lists bound names; `ls(x, ...)` lists what can be selected on each
/// argument: methods first, then fields (or mapping keys).
///
/// With a display tag configured only tagged fields are listed, under their
/// tagged names. Arguments that fail to load are skipped; `ls` never fails.
pub(crate) fn ls(env: &Environment, tag: Option<&str>, args: &[Value]) -> Value {
    let names = if args.is_empty() {
        env.names()
    } else {
        args.iter()
            .filter_map(|arg| arg.load().ok())
            .flat_map(|value| members_of(&value, tag))
            .collect()
    };
    Value::Sequence(Rc::new(VecSequence::strings(names)))
}

fn members_of(value: &Value, tag: Option<&str>) -> Vec<String> {
    let mut names: Vec<String> = value.methods().into_iter().map(|m| m.name).collect();
    match value {
        Value::Record(record) => {
            for field in record.fields() {
                match tag {
                    Some(key) => {
                        if let Some(name) = field.tagged_name(key) {
                            names.push(name.to_string());
                        }
                    }
                    None => names.push(field.name),
                }
            }
        }
        Value::Mapping(map) => names.extend(map.keys().iter().map(|k| k.to_string())),
        _ => {}
    }
    names
}

/// `str(x)`: string or byte content up to its first NUL.
pub(crate) fn str(arg: &Value) -> EvalResult<Value> {
    let value = arg.load()?;
    if let Some(s) = value.as_str() {
        return Ok(Value::String(until_nul(s.as_bytes())));
    }
    if let Value::Sequence(seq) = &value {
        if let Some(bytes) = seq.bytes() {
            return Ok(Value::String(until_nul(&bytes)));
        }
    }
    Err(EvalError::type_mismatch(format!(
        "cannot convert {} to string",
        value.type_name()
    )))
}

fn until_nul(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::Number;
    use crate::objects::{ByteBuffer, DynRecord, MapObject};

    fn strings(value: Value) -> Vec<String> {
        let Value::Sequence(seq) = value else {
            panic!("ls should return a sequence");
        };
        (0..seq.len())
            .map(|i| seq.get(i).map(|v| v.to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_ls_environment() {
        let mut env = Environment::new();
        env.bind("a", Value::Int(1)).unwrap();
        env.bind("b", Value::Int(2)).unwrap();
        assert_eq!(strings(ls(&env, None, &[])), vec!["a", "b"]);
    }

    #[test]
    fn test_ls_record_with_and_without_tag() {
        let rec = DynRecord::new("T")
            .add_tagged_field("Name", "json", "name,omitempty", "x")
            .add_field("Hidden", 1i64)
            .into_value();
        let env = Environment::new();
        assert_eq!(
            strings(ls(&env, None, std::slice::from_ref(&rec))),
            vec!["Name", "Hidden"]
        );
        assert_eq!(strings(ls(&env, Some("json"), &[rec])), vec!["name"]);
    }

    #[test]
    fn test_ls_mapping_keys() {
        let map = MapObject::new("map[string]int");
        map.insert("k1", Value::Int(1));
        map.insert("k2", Value::Int(2));
        let env = Environment::new();
        let out = ls(&env, None, &[Value::Mapping(Rc::new(map))]);
        assert_eq!(strings(out), vec!["k1", "k2"]);
    }

    #[test]
    fn test_ls_scalar_is_empty() {
        let env = Environment::new();
        assert!(strings(ls(&env, None, &[Value::Int(3)])).is_empty());
    }

    #[test]
    fn test_str_stops_at_nul() {
        let buf = Value::Sequence(Rc::new(ByteBuffer::new(b"abc\0garbage".to_vec())));
        assert_eq!(str(&buf).unwrap(), Value::String("abc".into()));
        let full = Value::Sequence(Rc::new(ByteBuffer::new(b"abc".to_vec())));
        assert_eq!(str(&full).unwrap(), Value::String("abc".into()));
    }

    #[test]
    fn test_str_cuts_strings_at_nul() {
        let native = Value::String("abc\0garbage".into());
        assert_eq!(str(&native).unwrap(), Value::String("abc".into()));
        let constant = Value::Constant(Number::String("x\0y".into()));
        assert_eq!(str(&constant).unwrap(), Value::String("x".into()));
    }

    #[test]
    fn test_str_rejects_other_kinds() {
        assert!(matches!(str(&Value::Int(1)), Err(EvalError::TypeMismatch(_))));
        assert_eq!(
            str(&Value::from("hi")).unwrap(),
            Value::String("hi".into())
        );
    }
}
