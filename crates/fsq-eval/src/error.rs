//! Runtime error types for the fsq evaluator.

use fsq_types::{ErrorCode, ParseErrors};
use thiserror::Error;

/// Evaluation error. One of these is produced per failing statement.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The statement did not lex or parse.
    #[error("parse error: {0}")]
    Parse(ParseErrors),
    /// More than one `=` in a statement.
    #[error("multiple assignment not supported")]
    MultipleAssignment,
    /// Name not bound in the environment, even after the naming fallback.
    #[error("unknown field or label {0:?}")]
    UnknownIdentifier(String),
    /// Record has neither a method nor a field by that name.
    #[error("{type_name} has no field {field:?}")]
    NoSuchField { type_name: String, field: String },
    /// Sequence or mapping has no method by that name.
    #[error("{type_name} has no method {method:?}")]
    NoSuchMethod { type_name: String, method: String },
    /// Operation not supported by the value's kind.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    /// Index or slice bound outside the sequence.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },
    /// Wrong number of call arguments.
    #[error("{name}: expected {expected} argument(s), got {got}")]
    ArityError {
        name: String,
        expected: String,
        got: usize,
    },
    /// Division or remainder by an exact zero.
    #[error("division by zero")]
    DivisionByZero,
    /// Operator not defined for its operands.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
    /// Operand has no constant form.
    #[error("unsupported promotion of type {0}")]
    Promotion(String),
    /// Constant does not fit its target representation.
    #[error("value out of range: {0}")]
    Range(String),
    /// Literal kind the evaluator does not handle (imaginary numbers).
    #[error("unsupported literal {0}")]
    UnsupportedLiteral(String),
    /// Binding name is empty or contains `.`.
    #[error("invalid name {0:?}: labels must be non-empty and can not contain '.'")]
    InvalidName(String),
    /// Mapping has no entry for the key.
    #[error("key {0} not found")]
    KeyNotFound(String),
    /// Error returned by a host object.
    #[error(transparent)]
    Host(#[from] HostError),
    /// A host function panicked.
    #[error("host panic: {0}")]
    HostPanic(String),
}

impl EvalError {
    /// Convert front-end errors, lifting multiple assignment to its own variant.
    pub fn from_parse(errors: ParseErrors) -> Self {
        if errors.contains(ErrorCode::MULTIPLE_ASSIGNMENT) {
            Self::MultipleAssignment
        } else {
            Self::Parse(errors)
        }
    }

    pub(crate) fn type_mismatch(message: impl Into<String>) -> Self {
        Self::TypeMismatch(message.into())
    }
}

/// Error raised by host code (methods, field writes, element writes).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
