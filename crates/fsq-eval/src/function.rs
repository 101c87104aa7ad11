//! Callable values: builtins, host functions and bound methods.

use std::fmt;
use std::rc::Rc;

use crate::error::HostError;
use crate::value::{Kind, Value};

/// Host function body. Receives demoted arguments, returns its results.
pub type NativeFn = Rc<dyn Fn(&[Value]) -> Result<Vec<Value>, HostError>>;

/// Declared type of a parameter or result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Accepts anything, places included.
    Any,
    Bool,
    Int,
    Float,
    String,
    Sequence,
    Record,
    Mapping,
    Function,
}

impl ParamType {
    /// Kind used as the demotion hint for constant arguments.
    pub fn hint(self) -> Option<Kind> {
        match self {
            ParamType::Bool => Some(Kind::Bool),
            ParamType::Int => Some(Kind::Int),
            ParamType::Float => Some(Kind::Float),
            ParamType::String => Some(Kind::String),
            _ => None,
        }
    }

    /// Whether a (loaded, demoted) value satisfies this type.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            ParamType::Any => true,
            ParamType::Bool => value.kind() == Kind::Bool,
            ParamType::Int => value.kind() == Kind::Int,
            ParamType::Float => value.kind() == Kind::Float,
            ParamType::String => value.kind() == Kind::String,
            ParamType::Sequence => value.kind() == Kind::Sequence,
            ParamType::Record => value.kind() == Kind::Record,
            ParamType::Mapping => value.kind() == Kind::Mapping,
            ParamType::Function => value.kind() == Kind::Function,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParamType::Any => "any",
            ParamType::Bool => "bool",
            ParamType::Int => "int",
            ParamType::Float => "float",
            ParamType::String => "string",
            ParamType::Sequence => "sequence",
            ParamType::Record => "record",
            ParamType::Mapping => "mapping",
            ParamType::Function => "func",
        };
        f.write_str(s)
    }
}

/// Parameter and result types of a function.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    pub params: Vec<ParamType>,
    /// The last parameter repeats zero or more times.
    pub variadic: bool,
    pub results: Vec<ParamType>,
}

impl Signature {
    pub fn new(params: Vec<ParamType>, results: Vec<ParamType>) -> Self {
        Self {
            params,
            variadic: false,
            results,
        }
    }

    pub fn variadic(params: Vec<ParamType>, results: Vec<ParamType>) -> Self {
        Self {
            params,
            variadic: true,
            results,
        }
    }

    /// Whether `count` arguments satisfy this signature.
    pub fn accepts_arity(&self, count: usize) -> bool {
        if self.variadic {
            count + 1 >= self.params.len()
        } else {
            count == self.params.len()
        }
    }

    /// Human-readable arity, for error messages.
    pub fn arity(&self) -> String {
        if self.variadic {
            format!("at least {}", self.params.len().saturating_sub(1))
        } else {
            self.params.len().to_string()
        }
    }

    /// Declared type of argument `index`.
    pub fn param(&self, index: usize) -> ParamType {
        match self.params.get(index) {
            Some(p) => *p,
            None if self.variadic => self.params.last().copied().unwrap_or(ParamType::Any),
            None => ParamType::Any,
        }
    }

    /// Takes no arguments at all.
    pub fn is_nullary(&self) -> bool {
        self.params.is_empty() && !self.variadic
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("func(")?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if self.variadic && i + 1 == self.params.len() {
                f.write_str("...")?;
            }
            write!(f, "{p}")?;
        }
        f.write_str(")")?;
        match self.results.as_slice() {
            [] => Ok(()),
            [one] => write!(f, " {one}"),
            many => {
                f.write_str(" (")?;
                for (i, r) in many.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{r}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Functions the evaluator implements itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Ls,
    Str,
}

#[derive(Clone)]
pub(crate) enum Callee {
    Builtin(Builtin),
    Native(NativeFn),
}

/// A callable value.
#[derive(Clone)]
pub struct Function {
    pub name: String,
    pub signature: Signature,
    pub(crate) callee: Callee,
}

impl Function {
    /// Wrap a host closure.
    pub fn native<F>(name: impl Into<String>, signature: Signature, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Vec<Value>, HostError> + 'static,
    {
        Self {
            name: name.into(),
            signature,
            callee: Callee::Native(Rc::new(body)),
        }
    }

    pub(crate) fn builtin(builtin: Builtin) -> Self {
        let (name, signature) = match builtin {
            Builtin::Ls => (
                "ls",
                Signature::variadic(vec![ParamType::Any], vec![ParamType::Sequence]),
            ),
            Builtin::Str => (
                "str",
                Signature::new(vec![ParamType::Any], vec![ParamType::String]),
            ),
        };
        Self {
            name: name.to_string(),
            signature,
            callee: Callee::Builtin(builtin),
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (&self.callee, &other.callee) {
            (Callee::Builtin(a), Callee::Builtin(b)) => a == b,
            (Callee::Native(a), Callee::Native(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sig = self.signature.to_string();
        // "func(...)" → "func name(...)"
        write!(f, "func {}{}", self.name, &sig["func".len()..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_display() {
        let sig = Signature::new(vec![ParamType::Int, ParamType::String], vec![ParamType::Bool]);
        assert_eq!(sig.to_string(), "func(int, string) bool");
        let sig = Signature::variadic(vec![ParamType::Any], vec![]);
        assert_eq!(sig.to_string(), "func(...any)");
        let sig = Signature::new(vec![], vec![ParamType::Int, ParamType::Int]);
        assert_eq!(sig.to_string(), "func() (int, int)");
    }

    #[test]
    fn test_variadic_arity() {
        let sig = Signature::variadic(vec![ParamType::String, ParamType::Int], vec![]);
        assert!(!sig.accepts_arity(0));
        assert!(sig.accepts_arity(1));
        assert!(sig.accepts_arity(4));
        assert_eq!(sig.param(3), ParamType::Int);
        assert_eq!(sig.arity(), "at least 1");
    }

    #[test]
    fn test_function_display() {
        assert_eq!(
            Function::builtin(Builtin::Str).to_string(),
            "func str(any) string"
        );
    }
}
