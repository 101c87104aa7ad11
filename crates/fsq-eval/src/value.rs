//! The runtime value model.
//!
//! A [`Value`] is either a scalar, an untyped constant, a handle to a host
//! object, a callable, a multi-result list or a [`Place`] that refers to a
//! slot inside a host object.

use std::fmt;
use std::rc::Rc;

use crate::error::{EvalError, EvalResult, HostError};
use crate::function::Function;
use crate::host::{Mapping, MethodSig, Record, Sequence};
use crate::number::Number;
use crate::place::Place;

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Invalid,
    Bool,
    Int,
    Float,
    String,
    Constant,
    Sequence,
    Record,
    Mapping,
    Function,
    List,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::Invalid => "invalid",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Constant => "constant",
            Kind::Sequence => "sequence",
            Kind::Record => "record",
            Kind::Mapping => "mapping",
            Kind::Function => "func",
            Kind::List => "list",
        };
        f.write_str(s)
    }
}

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    /// No value: the result of an assignment or a zero-result call.
    Invalid,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Untyped constant from a literal or an operator.
    Constant(Number),
    Sequence(Rc<dyn Sequence>),
    Record(Rc<dyn Record>),
    Mapping(Rc<dyn Mapping>),
    Function(Function),
    /// Results of a call returning more than one value.
    List(Vec<Value>),
    /// An addressable slot inside a host object.
    Ref(Place),
}

impl Value {
    /// The kind of this value; a place reports the kind it currently holds.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Invalid => Kind::Invalid,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::String(_) => Kind::String,
            Value::Constant(_) => Kind::Constant,
            Value::Sequence(_) => Kind::Sequence,
            Value::Record(_) => Kind::Record,
            Value::Mapping(_) => Kind::Mapping,
            Value::Function(_) => Kind::Function,
            Value::List(_) => Kind::List,
            Value::Ref(place) => place.load().map(|v| v.kind()).unwrap_or(Kind::Invalid),
        }
    }

    /// Host type name for objects, the kind name otherwise.
    pub fn type_name(&self) -> String {
        match self {
            Value::Sequence(s) => s.type_name().to_string(),
            Value::Record(r) => r.type_name().to_string(),
            Value::Mapping(m) => m.type_name().to_string(),
            Value::Constant(n) => n.kind_name().to_string(),
            Value::Ref(place) => match place.load() {
                Ok(v) => format!("*{}", v.type_name()),
                Err(_) => "*invalid".to_string(),
            },
            other => other.kind().to_string(),
        }
    }

    /// Load through a place; other values are cloned.
    pub fn load(&self) -> EvalResult<Value> {
        match self {
            Value::Ref(place) => place.load(),
            other => Ok(other.clone()),
        }
    }

    // ── Capability probes ─────────────────────────────────────────────────────

    pub fn is_valid(&self) -> bool {
        !matches!(self, Value::Invalid)
    }

    pub fn is_addressable(&self) -> bool {
        matches!(self, Value::Ref(_))
    }

    pub fn is_callable(&self) -> bool {
        self.kind() == Kind::Function
    }

    pub fn is_record(&self) -> bool {
        self.kind() == Kind::Record
    }

    pub fn is_sequence(&self) -> bool {
        self.kind() == Kind::Sequence
    }

    pub fn is_mapping(&self) -> bool {
        self.kind() == Kind::Mapping
    }

    // ── Methods on objects ────────────────────────────────────────────────────

    /// Methods exposed by the object this value holds, in declaration order.
    pub fn methods(&self) -> Vec<MethodSig> {
        match self {
            Value::Sequence(s) => s.methods(),
            Value::Record(r) => r.methods(),
            Value::Mapping(m) => m.methods(),
            _ => Vec::new(),
        }
    }

    /// Invoke a method on the object this value holds.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Vec<Value>, HostError> {
        match self {
            Value::Sequence(s) => s.invoke(name, args),
            Value::Record(r) => r.invoke(name, args),
            Value::Mapping(m) => m.invoke(name, args),
            other => Err(HostError::new(format!(
                "{} has no methods",
                other.type_name()
            ))),
        }
    }

    /// Borrow the string content of a string or string constant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Constant(Number::String(s)) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn expect_function(self) -> EvalResult<Function> {
        match self {
            Value::Function(f) => Ok(f),
            other => Err(EvalError::type_mismatch(format!(
                "{} is not a function or method",
                other.type_name()
            ))),
        }
    }
}

impl PartialEq for Value {
    /// Scalars compare by value, objects by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Invalid, Value::Invalid) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Constant(a), Value::Constant(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => Rc::ptr_eq(a, b),
            (Value::Record(a), Value::Record(b)) => Rc::ptr_eq(a, b),
            (Value::Mapping(a), Value::Mapping(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Ref(a), Value::Ref(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Invalid => f.write_str("<invalid>"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
            Value::Constant(n) => write!(f, "{n}"),
            Value::Sequence(s) => write!(f, "{}[{}]", s.type_name(), s.len()),
            Value::Record(r) => write!(f, "{}{{...}}", r.type_name()),
            Value::Mapping(m) => write!(f, "{}[{} keys]", m.type_name(), m.len()),
            Value::Function(func) => write!(f, "{func}"),
            Value::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
            Value::Ref(place) => match place.load() {
                Ok(v) => write!(f, "{v}"),
                Err(_) => f.write_str("<invalid>"),
            },
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Constant(n)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}
