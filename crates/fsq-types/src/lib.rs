//! Shared types for fsq.
//!
//! This crate defines the expression AST, source spans and the parse error
//! types shared by the lexer, the parser and the evaluator.

mod error;
mod span;
pub mod ast;

pub use error::{ErrorCategory, ErrorCode, ParseError, ParseErrors, MAX_ERRORS};
pub use span::Span;

/// Result type used by the front end.
pub type Result<T> = std::result::Result<T, ParseErrors>;
