//! Addressable places: a handle to one slot inside a host object.
//!
//! Selecting a field, indexing a sequence or indexing a mapping yields a
//! [`Place`] rather than a copy, so the caller can read the live slot or
//! write back through it.

use std::rc::Rc;

use crate::error::{EvalError, EvalResult};
use crate::host::{Mapping, Record, Sequence};
use crate::number::demote_value;
use crate::value::Value;

/// Owner object plus one step into it.
#[derive(Debug, Clone)]
pub enum Place {
    /// A record field, by native name.
    Field { record: Rc<dyn Record>, name: String },
    /// A sequence element.
    Element { seq: Rc<dyn Sequence>, index: usize },
    /// A mapping entry.
    Entry { map: Rc<dyn Mapping>, key: Box<Value> },
}

impl Place {
    /// Read the current content of the slot.
    pub fn load(&self) -> EvalResult<Value> {
        match self {
            Place::Field { record, name } => {
                record.field(name).ok_or_else(|| EvalError::NoSuchField {
                    type_name: record.type_name().to_string(),
                    field: name.clone(),
                })
            }
            Place::Element { seq, index } => {
                seq.get(*index).ok_or(EvalError::IndexOutOfRange {
                    index: *index as i64,
                    len: seq.len(),
                })
            }
            Place::Entry { map, key } => map
                .get(key)
                .ok_or_else(|| EvalError::KeyNotFound(key.to_string())),
        }
    }

    /// Write `value` into the slot.
    ///
    /// Places are loaded first and constants are demoted using the kind
    /// currently held by the slot as the hint.
    pub fn store(&self, value: Value) -> EvalResult<()> {
        let value = value.load()?;
        let hint = self.load().ok().map(|current| current.kind());
        let value = demote_value(value, hint)?;
        match self {
            Place::Field { record, name } => record.set_field(name, value)?,
            Place::Element { seq, index } => seq.set(*index, value)?,
            Place::Entry { map, key } => map.set(key.as_ref().clone(), value)?,
        }
        Ok(())
    }
}

impl PartialEq for Place {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Place::Field { record: a, name: x }, Place::Field { record: b, name: y }) => {
                Rc::ptr_eq(a, b) && x == y
            }
            (Place::Element { seq: a, index: i }, Place::Element { seq: b, index: j }) => {
                Rc::ptr_eq(a, b) && i == j
            }
            (Place::Entry { map: a, key: x }, Place::Entry { map: b, key: y }) => {
                Rc::ptr_eq(a, b) && x == y
            }
            _ => false,
        }
    }
}
