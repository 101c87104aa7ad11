//! Capability traits implemented by host objects.
//!
//! The evaluator never inspects host types directly. Everything it can do
//! with an object (list its methods, invoke one, read or write a field, an
//! element or an entry) goes through these traits. Writes take `&self`:
//! hosts that allow them use interior mutability.

use std::fmt;

use crate::error::HostError;
use crate::function::Signature;
use crate::value::{Kind, Value};

/// A method exposed by a host object.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSig {
    pub name: String,
    pub signature: Signature,
}

impl MethodSig {
    pub fn new(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            signature,
        }
    }
}

/// Behaviour shared by every host object.
pub trait Object: fmt::Debug {
    /// Type name used in messages and `ls` output.
    fn type_name(&self) -> &str;

    /// Methods in declaration order.
    fn methods(&self) -> Vec<MethodSig> {
        Vec::new()
    }

    /// Call the method `name`. Only names listed by [`Object::methods`]
    /// are ever passed in.
    fn invoke(&self, name: &str, _args: &[Value]) -> Result<Vec<Value>, HostError> {
        Err(HostError::new(format!(
            "{} has no method {name:?}",
            self.type_name()
        )))
    }
}

// ── Records ───────────────────────────────────────────────────────────────────

/// Static description of a record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// Native field name.
    pub name: String,
    /// `(key, value)` annotations, e.g. `("json", "year,omitempty")`.
    pub tags: Vec<(String, String)>,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }

    /// Raw tag value for `key`.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Display name under `key`: the tag value up to its first comma.
    pub fn tagged_name(&self, key: &str) -> Option<&str> {
        self.tag(key)
            .map(|value| value.split(',').next().unwrap_or(value))
    }
}

/// A host object with named fields.
pub trait Record: Object {
    /// Field descriptions in declaration order.
    fn fields(&self) -> Vec<FieldInfo>;

    /// Current value of a field by native name.
    fn field(&self, name: &str) -> Option<Value>;

    /// Overwrite a field by native name.
    fn set_field(&self, name: &str, _value: Value) -> Result<(), HostError> {
        Err(HostError::new(format!(
            "field {name:?} of {} is read-only",
            self.type_name()
        )))
    }
}

// ── Sequences ─────────────────────────────────────────────────────────────────

/// An indexable host sequence.
pub trait Sequence: Object {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`, `None` when out of range.
    fn get(&self, index: usize) -> Option<Value>;

    fn set(&self, index: usize, _value: Value) -> Result<(), HostError> {
        Err(HostError::new(format!(
            "element {index} of {} is read-only",
            self.type_name()
        )))
    }

    /// Raw content when this is a byte sequence.
    fn bytes(&self) -> Option<Vec<u8>> {
        None
    }
}

// ── Mappings ──────────────────────────────────────────────────────────────────

/// A keyed host collection.
pub trait Mapping: Object {
    /// Keys in iteration order.
    fn keys(&self) -> Vec<Value>;

    fn get(&self, key: &Value) -> Option<Value>;

    fn set(&self, _key: Value, _value: Value) -> Result<(), HostError> {
        Err(HostError::new(format!("{} is read-only", self.type_name())))
    }

    /// Kind keys are demoted to before lookup.
    fn key_kind(&self) -> Kind {
        Kind::String
    }

    fn len(&self) -> usize {
        self.keys().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
