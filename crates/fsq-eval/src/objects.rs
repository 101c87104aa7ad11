//! Ready-made host objects.
//!
//! Embedders with their own types implement the traits in [`crate::host`]
//! directly; these cover the common shapes (a vector, a byte buffer, a
//! string-keyed map, a record assembled at runtime) and back the slice
//! views and environment snapshots produced by the evaluator itself.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::HostError;
use crate::function::{NativeFn, Signature};
use crate::host::{FieldInfo, Mapping, MethodSig, Object, Record, Sequence};
use crate::value::Value;

fn kind_check(type_name: &str, what: &str, current: &Value, new: &Value) -> Result<(), HostError> {
    let (have, want) = (new.kind(), current.kind());
    if have == want {
        Ok(())
    } else {
        Err(HostError::new(format!(
            "cannot assign {have} to {what} of {type_name} (type {want})"
        )))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// VecSequence
// ══════════════════════════════════════════════════════════════════════════════

/// A growable sequence of arbitrary values.
#[derive(Debug)]
pub struct VecSequence {
    type_name: String,
    items: RefCell<Vec<Value>>,
}

impl VecSequence {
    pub fn new(type_name: impl Into<String>, items: Vec<Value>) -> Self {
        Self {
            type_name: type_name.into(),
            items: RefCell::new(items),
        }
    }

    /// A `[]string` sequence.
    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            "[]string",
            items.into_iter().map(|s| Value::String(s.into())).collect(),
        )
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }
}

impl Object for VecSequence {
    fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl Sequence for VecSequence {
    fn len(&self) -> usize {
        self.items.borrow().len()
    }

    fn get(&self, index: usize) -> Option<Value> {
        self.items.borrow().get(index).cloned()
    }

    fn set(&self, index: usize, value: Value) -> Result<(), HostError> {
        let mut items = self.items.borrow_mut();
        let slot = items
            .get_mut(index)
            .ok_or_else(|| HostError::new(format!("index {index} out of range")))?;
        if slot.is_valid() {
            kind_check(&self.type_name, "element", slot, &value)?;
        }
        *slot = value;
        Ok(())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// ByteBuffer
// ══════════════════════════════════════════════════════════════════════════════

/// A mutable byte array. Elements read as `int`.
#[derive(Debug)]
pub struct ByteBuffer {
    type_name: String,
    data: RefCell<Vec<u8>>,
}

impl ByteBuffer {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        Self {
            type_name: format!("[{}]byte", data.len()),
            data: RefCell::new(data),
        }
    }

    /// A zero-filled buffer holding `content` at its start.
    pub fn padded(content: &[u8], size: usize) -> Self {
        let mut data = vec![0u8; size.max(content.len())];
        data[..content.len()].copy_from_slice(content);
        Self::new(data)
    }
}

impl Object for ByteBuffer {
    fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl Sequence for ByteBuffer {
    fn len(&self) -> usize {
        self.data.borrow().len()
    }

    fn get(&self, index: usize) -> Option<Value> {
        self.data
            .borrow()
            .get(index)
            .map(|b| Value::Int(i64::from(*b)))
    }

    fn set(&self, index: usize, value: Value) -> Result<(), HostError> {
        let byte = match value {
            Value::Int(i) => u8::try_from(i)
                .map_err(|_| HostError::new(format!("{i} overflows byte")))?,
            other => {
                return Err(HostError::new(format!(
                    "cannot assign {} to byte",
                    other.kind()
                )))
            }
        };
        let mut data = self.data.borrow_mut();
        let slot = data
            .get_mut(index)
            .ok_or_else(|| HostError::new(format!("index {index} out of range")))?;
        *slot = byte;
        Ok(())
    }

    fn bytes(&self) -> Option<Vec<u8>> {
        Some(self.data.borrow().clone())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// SliceView
// ══════════════════════════════════════════════════════════════════════════════

/// A window `[start, start + len)` over another sequence, sharing storage.
#[derive(Debug)]
pub struct SliceView {
    base: Rc<dyn Sequence>,
    start: usize,
    len: usize,
    type_name: String,
}

impl SliceView {
    /// Callers guarantee `low <= high <= base.len()`.
    pub fn new(base: Rc<dyn Sequence>, low: usize, high: usize) -> Self {
        let len = high.saturating_sub(low);
        let type_name = if base.bytes().is_some() {
            "[]byte".to_string()
        } else {
            base.type_name().to_string()
        };
        Self {
            base,
            start: low,
            len,
            type_name,
        }
    }
}

impl Object for SliceView {
    fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl Sequence for SliceView {
    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, index: usize) -> Option<Value> {
        if index < self.len {
            self.base.get(self.start + index)
        } else {
            None
        }
    }

    fn set(&self, index: usize, value: Value) -> Result<(), HostError> {
        if index >= self.len {
            return Err(HostError::new(format!("index {index} out of range")));
        }
        self.base.set(self.start + index, value)
    }

    fn bytes(&self) -> Option<Vec<u8>> {
        self.base
            .bytes()
            .map(|all| all[self.start..self.start + self.len].to_vec())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// MapObject
// ══════════════════════════════════════════════════════════════════════════════

/// An insertion-ordered, string-keyed map.
#[derive(Debug)]
pub struct MapObject {
    type_name: String,
    entries: RefCell<IndexMap<String, Value>>,
}

impl MapObject {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self::from_entries(type_name, IndexMap::new())
    }

    pub fn from_entries(type_name: impl Into<String>, entries: IndexMap<String, Value>) -> Self {
        Self {
            type_name: type_name.into(),
            entries: RefCell::new(entries),
        }
    }

    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.entries.borrow_mut().insert(key.into(), value);
    }
}

impl Object for MapObject {
    fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl Mapping for MapObject {
    fn keys(&self) -> Vec<Value> {
        self.entries
            .borrow()
            .keys()
            .map(|k| Value::String(k.clone()))
            .collect()
    }

    fn get(&self, key: &Value) -> Option<Value> {
        let key = key.as_str()?;
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: Value, value: Value) -> Result<(), HostError> {
        let Some(key) = key.as_str() else {
            return Err(HostError::new(format!(
                "{} keys must be strings, got {}",
                self.type_name,
                key.kind()
            )));
        };
        self.insert(key, value);
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// DynRecord
// ══════════════════════════════════════════════════════════════════════════════

/// A record whose fields and methods are assembled at runtime.
///
/// Field writes must keep the kind the field was created with.
pub struct DynRecord {
    type_name: String,
    fields: RefCell<Vec<(FieldInfo, Value)>>,
    methods: Vec<(MethodSig, NativeFn)>,
}

impl DynRecord {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: RefCell::new(Vec::new()),
            methods: Vec::new(),
        }
    }

    /// Add an untagged field.
    pub fn add_field(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_field(FieldInfo::new(name), value.into())
    }

    /// Add a field carrying a single `key:"value"` tag.
    pub fn add_tagged_field(
        self,
        name: impl Into<String>,
        key: &str,
        tag: &str,
        value: impl Into<Value>,
    ) -> Self {
        self.with_field(FieldInfo::new(name).with_tag(key, tag), value.into())
    }

    pub fn with_field(self, info: FieldInfo, value: Value) -> Self {
        self.fields.borrow_mut().push((info, value));
        self
    }

    /// Add a method.
    pub fn add_method<F>(mut self, name: impl Into<String>, signature: Signature, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Vec<Value>, HostError> + 'static,
    {
        self.methods
            .push((MethodSig::new(name, signature), Rc::new(body)));
        self
    }

    /// Finish building and wrap as a value.
    pub fn into_value(self) -> Value {
        Value::Record(Rc::new(self))
    }
}

impl std::fmt::Debug for DynRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynRecord")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .field(
                "methods",
                &self.methods.iter().map(|(m, _)| &m.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Object for DynRecord {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn methods(&self) -> Vec<MethodSig> {
        self.methods.iter().map(|(sig, _)| sig.clone()).collect()
    }

    fn invoke(&self, name: &str, args: &[Value]) -> Result<Vec<Value>, HostError> {
        let (_, body) = self
            .methods
            .iter()
            .find(|(sig, _)| sig.name == name)
            .ok_or_else(|| {
                HostError::new(format!("{} has no method {name:?}", self.type_name))
            })?;
        body(args)
    }
}

impl Record for DynRecord {
    fn fields(&self) -> Vec<FieldInfo> {
        self.fields
            .borrow()
            .iter()
            .map(|(info, _)| info.clone())
            .collect()
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.fields
            .borrow()
            .iter()
            .find(|(info, _)| info.name == name)
            .map(|(_, value)| value.clone())
    }

    fn set_field(&self, name: &str, value: Value) -> Result<(), HostError> {
        let mut fields = self.fields.borrow_mut();
        let (_, slot) = fields
            .iter_mut()
            .find(|(info, _)| info.name == name)
            .ok_or_else(|| {
                HostError::new(format!("{} has no field {name:?}", self.type_name))
            })?;
        kind_check(&self.type_name, name, slot, &value)?;
        *slot = value;
        Ok(())
    }
}
