//! Global name environment for the fsq evaluator.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::{EvalError, EvalResult};
use crate::objects::MapObject;
use crate::value::Value;

/// Flat, insertion-ordered map from names to values.
///
/// There is one scope. Binding an existing name overwrites it in place, so
/// the name keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: IndexMap<String, Value>,
}

impl Environment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`.
    ///
    /// The name is trimmed; empty names and names containing `.` are rejected.
    pub fn bind(&mut self, name: &str, value: Value) -> EvalResult<()> {
        let name = name.trim();
        if name.is_empty() || name.contains('.') {
            return Err(EvalError::InvalidName(name.to_string()));
        }
        self.bindings.insert(name.to_string(), value);
        Ok(())
    }

    /// Look up a name exactly as written.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Bound names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.bindings.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// A mapping holding a copy of every binding.
    pub fn snapshot(&self) -> Value {
        Value::Mapping(Rc::new(MapObject::from_entries(
            "environment",
            self.bindings.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_and_lookup() {
        let mut env = Environment::new();
        env.bind("x", Value::Int(1)).unwrap();
        assert_eq!(env.lookup("x"), Some(&Value::Int(1)));
        assert_eq!(env.lookup("y"), None);
    }

    #[test]
    fn test_bind_trims_name() {
        let mut env = Environment::new();
        env.bind("  x \t", Value::Int(1)).unwrap();
        assert_eq!(env.names(), vec!["x"]);
    }

    #[test]
    fn test_bind_rejects_bad_names() {
        let mut env = Environment::new();
        assert_eq!(
            env.bind("a.b", Value::Int(1)),
            Err(EvalError::InvalidName("a.b".into()))
        );
        assert!(matches!(
            env.bind("   ", Value::Int(1)),
            Err(EvalError::InvalidName(_))
        ));
        assert!(env.is_empty());
    }

    #[test]
    fn test_rebind_keeps_position() {
        let mut env = Environment::new();
        env.bind("a", Value::Int(1)).unwrap();
        env.bind("b", Value::Int(2)).unwrap();
        env.bind("a", Value::Int(3)).unwrap();
        assert_eq!(env.names(), vec!["a", "b"]);
        assert_eq!(env.lookup("a"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut env = Environment::new();
        env.bind("a", Value::Int(1)).unwrap();
        let snap = env.snapshot();
        env.bind("b", Value::Int(2)).unwrap();
        let Value::Mapping(map) = snap else {
            panic!("snapshot should be a mapping");
        };
        assert_eq!(map.keys(), vec![Value::String("a".into())]);
    }
}
