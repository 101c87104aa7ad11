use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of errors collected for one statement.
pub const MAX_ERRORS: usize = 8;

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Lexical,
    Syntax,
}

/// Numeric error code (E100–E299).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Lexical errors (E100–E199) ──
    pub const UNEXPECTED_CHARACTER: Self = Self(100);
    pub const UNTERMINATED_LITERAL: Self = Self(101);
    pub const INVALID_ESCAPE: Self = Self(102);
    pub const MALFORMED_NUMBER: Self = Self(103);
    pub const INVALID_RUNE: Self = Self(104);

    // ── Syntax errors (E200–E299) ──
    pub const UNEXPECTED_TOKEN: Self = Self(200);
    pub const TRAILING_INPUT: Self = Self(201);
    pub const NESTING_LIMIT_EXCEEDED: Self = Self(202);
    pub const INVALID_ASSIGN_TARGET: Self = Self(203);
    pub const MULTIPLE_ASSIGNMENT: Self = Self(204);
    pub const EMPTY_EXPRESSION: Self = Self(205);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Lexical,
            _ => ErrorCategory::Syntax,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => write!(f, "lexical"),
            Self::Syntax => write!(f, "syntax"),
        }
    }
}

/// A structured front-end error.
///
/// Carries the offending text alongside its span so a caller can report
/// it without keeping the statement source around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseError {
    /// Error code (e.g., E200).
    pub code: ErrorCode,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// Location inside the statement.
    pub span: Span,
    /// The source text covered by `span`.
    pub snippet: String,
}

impl ParseError {
    /// Create a new error, copying the spanned text out of `source`.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span, source: &str) -> Self {
        Self {
            code,
            category: code.category(),
            message: message.into(),
            span,
            snippet: span.text(source).to_string(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.span, self.code, self.message)?;
        if !self.snippet.is_empty() {
            write!(f, " (at {:?})", self.snippet)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Errors collected while lexing and parsing one statement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParseErrors {
    pub errors: Vec<ParseError>,
    pub total_errors: usize,
}

impl ParseErrors {
    /// Create an empty collection.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Whether the collector is full and scanning should stop.
    pub fn is_full(&self) -> bool {
        self.total_errors >= MAX_ERRORS
    }

    /// Add an error, respecting the MAX_ERRORS limit.
    pub fn push(&mut self, error: ParseError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    /// Append every error from `other`.
    pub fn extend(&mut self, other: ParseErrors) {
        let dropped = other.total_errors - other.errors.len();
        for error in other.errors {
            self.push(error);
        }
        self.total_errors += dropped;
    }

    /// The first error, which is the one worth surfacing to a user.
    pub fn first(&self) -> Option<&ParseError> {
        self.errors.first()
    }

    /// Whether any collected error has the given code.
    pub fn contains(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first() {
            Some(first) if self.total_errors > 1 => {
                write!(f, "{first} (+{} more)", self.total_errors - 1)
            }
            Some(first) => write!(f, "{first}"),
            None => write!(f, "no errors"),
        }
    }
}

impl std::error::Error for ParseErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_category() {
        assert_eq!(
            ErrorCode::UNEXPECTED_CHARACTER.category(),
            ErrorCategory::Lexical
        );
        assert_eq!(ErrorCode::MALFORMED_NUMBER.category(), ErrorCategory::Lexical);
        assert_eq!(ErrorCode::UNEXPECTED_TOKEN.category(), ErrorCategory::Syntax);
        assert_eq!(
            ErrorCode::MULTIPLE_ASSIGNMENT.category(),
            ErrorCategory::Syntax
        );
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(format!("{}", ErrorCode::UNEXPECTED_TOKEN), "E200");
        assert_eq!(format!("{}", ErrorCode::INVALID_ESCAPE), "E102");
    }

    #[test]
    fn test_parse_error_snippet() {
        let err = ParseError::new(
            ErrorCode::UNEXPECTED_CHARACTER,
            "unexpected character '$'",
            Span::new(3, 4),
            "fs.$x",
        );
        assert_eq!(err.snippet, "$");
        assert_eq!(err.category, ErrorCategory::Lexical);
        assert_eq!(
            err.to_string(),
            "col 4: E100 unexpected character '$' (at \"$\")"
        );
    }

    #[test]
    fn test_parse_errors_max_limit() {
        let mut errs = ParseErrors::empty();
        for i in 0..12 {
            errs.push(ParseError::new(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("error {i}"),
                Span::point(i),
                "",
            ));
        }
        assert_eq!(errs.errors.len(), MAX_ERRORS);
        assert_eq!(errs.total_errors, 12);
        assert!(errs.is_full());
        assert_eq!(errs.first().map(|e| e.message.as_str()), Some("error 0"));
    }

    #[test]
    fn test_parse_errors_extend_keeps_totals() {
        let mut a = ParseErrors::empty();
        let mut b = ParseErrors::empty();
        for i in 0..10 {
            b.push(ParseError::new(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("e{i}"),
                Span::point(0),
                "",
            ));
        }
        a.extend(b);
        assert_eq!(a.total_errors, 10);
        assert_eq!(a.errors.len(), MAX_ERRORS);
    }

    #[test]
    fn test_parse_error_json_serialization() {
        let err = ParseError::new(
            ErrorCode::MULTIPLE_ASSIGNMENT,
            "multiple assignment not supported",
            Span::new(6, 7),
            "x = 1 = 2",
        );
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"code\":204"));
        assert!(json.contains("\"category\":\"syntax\""));
        assert!(json.contains("\"snippet\":\"=\""));

        let back: ParseError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
