//! Dynamic member resolution: `base.name` against host objects.
//!
//! For each candidate name (as written, then after the naming-convention
//! transform) the resolver tries a method, then a field by its tagged
//! display name, then a field by its native name.

use std::rc::Rc;

use tracing::trace;

use crate::error::{EvalError, EvalResult};
use crate::function::Function;
use crate::host::Record;
use crate::place::Place;
use crate::value::Value;

/// Map a script-style name onto a host-style one.
///
/// The first letter and every letter after an underscore are upper-cased
/// and underscores are dropped; a leading underscore becomes `X`.
/// `foo_bar` → `FooBar`, `_foo` → `Xfoo`.
pub fn transform_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 1);
    let mut rest = name;
    if let Some(stripped) = name.strip_prefix('_') {
        out.push('X');
        rest = stripped;
    }
    // The first letter counts as following an underscore.
    let mut upper_next = out.is_empty();
    for c in rest.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Candidate names, as written first; the transform is skipped when it is
/// a no-op.
pub(crate) fn candidates(name: &str) -> Vec<String> {
    let transformed = transform_name(name);
    if transformed == name {
        vec![name.to_string()]
    } else {
        vec![name.to_string(), transformed]
    }
}

/// Resolve `base.name`.
///
/// Methods come back as bound functions (not invoked); fields come back as
/// places on the record.
pub(crate) fn select(base: &Value, name: &str, tag: Option<&str>) -> EvalResult<Value> {
    let base = base.load()?;
    for candidate in candidates(name) {
        if let Some(method) = bind_method(&base, &candidate) {
            trace!(name = %candidate, "resolved method");
            return Ok(Value::Function(method));
        }
        if let Value::Record(record) = &base {
            if let Some(place) = field_place(record, &candidate, tag) {
                trace!(name = %candidate, "resolved field");
                return Ok(Value::Ref(place));
            }
        }
    }

    Err(match &base {
        Value::Record(record) => EvalError::NoSuchField {
            type_name: record.type_name().to_string(),
            field: name.to_string(),
        },
        Value::Sequence(_) | Value::Mapping(_) => EvalError::NoSuchMethod {
            type_name: base.type_name(),
            method: name.to_string(),
        },
        other => EvalError::type_mismatch(format!(
            "select field {name:?} from type {}",
            other.type_name()
        )),
    })
}

/// Look up a method on an object and bind it to the receiver.
fn bind_method(receiver: &Value, name: &str) -> Option<Function> {
    let sig = receiver
        .methods()
        .into_iter()
        .find(|m| m.name == name)?;
    let receiver = receiver.clone();
    let method = sig.name.clone();
    Some(Function::native(sig.name, sig.signature, move |args| {
        receiver.invoke(&method, args)
    }))
}

/// Find a field by tagged display name, then by native name.
fn field_place(record: &Rc<dyn Record>, name: &str, tag: Option<&str>) -> Option<Place> {
    let fields = record.fields();
    let by_tag = tag.and_then(|key| fields.iter().find(|f| f.tagged_name(key) == Some(name)));
    let info = by_tag.or_else(|| fields.iter().find(|f| f.name == name))?;
    Some(Place::Field {
        record: Rc::clone(record),
        name: info.name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Signature;
    use crate::objects::{DynRecord, VecSequence};

    #[test]
    fn test_transform_name() {
        assert_eq!(transform_name("foo_bar"), "FooBar");
        assert_eq!(transform_name("_foo"), "Xfoo");
        assert_eq!(transform_name("name"), "Name");
        assert_eq!(transform_name("a_b_c"), "ABC");
        assert_eq!(transform_name("Already"), "Already");
        assert_eq!(transform_name("__x"), "XX");
    }

    #[test]
    fn test_candidates_skip_identity() {
        assert_eq!(candidates("Name"), vec!["Name"]);
        assert_eq!(candidates("name"), vec!["name", "Name"]);
    }

    fn record() -> Value {
        DynRecord::new("Time")
            .add_tagged_field("Year", "json", "year,omitempty", 2024i64)
            .add_field("Month", 5i64)
            .add_field("Xtemp", 21i64)
            .add_method("Now", Signature::default(), |_| Ok(vec![Value::Int(1)]))
            .into_value()
    }

    #[test]
    fn test_select_method_before_field() {
        let v = select(&record(), "Now", None).unwrap();
        assert!(matches!(v, Value::Function(ref f) if f.name == "Now"));
    }

    #[test]
    fn test_select_tagged_and_native() {
        let year = select(&record(), "year", Some("json")).unwrap();
        assert!(year.is_addressable());
        assert_eq!(year.load().unwrap(), Value::Int(2024));
        let month = select(&record(), "Month", Some("json")).unwrap();
        assert_eq!(month.load().unwrap(), Value::Int(5));
    }

    #[test]
    fn test_select_via_transform() {
        let month = select(&record(), "month", None).unwrap();
        assert_eq!(month.load().unwrap(), Value::Int(5));
        let temp = select(&record(), "_temp", None).unwrap();
        assert_eq!(temp.load().unwrap(), Value::Int(21));
        let now = select(&record(), "now", None).unwrap();
        assert!(now.is_callable());
    }

    #[test]
    fn test_select_errors() {
        assert!(matches!(
            select(&record(), "missing", None),
            Err(EvalError::NoSuchField { .. })
        ));
        let seq = Value::Sequence(Rc::new(VecSequence::strings(["a"])));
        assert!(matches!(
            select(&seq, "len", None),
            Err(EvalError::NoSuchMethod { .. })
        ));
        assert!(matches!(
            select(&Value::Int(1), "x", None),
            Err(EvalError::TypeMismatch(_))
        ));
    }
}
