//! Core parser infrastructure: token cursor, error reporting, helpers.

use fsq_lexer::{Token, TokenKind};
use fsq_types::ast::{Ident, Stmt};
use fsq_types::{ErrorCode, ParseError, ParseErrors, Span};

/// Maximum depth of the expression tree of one statement: parentheses,
/// unary operators, binary operator chains and postfix chains all count.
pub const MAX_NESTING_DEPTH: u32 = 64;

/// The fsq parser.
///
/// Consumes the token stream of one statement and builds a [`Stmt`].
pub struct Parser<'src> {
    /// The token stream (ends with `Eof`).
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Statement text, for error snippets.
    source: &'src str,
    /// Collected errors.
    errors: ParseErrors,
    /// Current expression nesting depth.
    pub(crate) depth: u32,
}

/// Result of parsing.
pub struct ParseResult {
    pub stmt: Option<Stmt>,
    pub errors: ParseErrors,
}

impl ParseResult {
    /// Collapse into a `Result`, failing when any error was reported.
    pub fn into_result(self) -> fsq_types::Result<Stmt> {
        match self.stmt {
            Some(stmt) if !self.errors.has_errors() => Ok(stmt),
            _ => Err(self.errors),
        }
    }
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and the text it was lexed from.
    pub fn new(mut tokens: Vec<Token>, source: &'src str) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            tokens.push(Token::new(TokenKind::Eof, Span::point(source.len())));
        }
        Self {
            tokens,
            pos: 0,
            source,
            errors: ParseErrors::empty(),
            depth: 0,
        }
    }

    /// Parse the whole token stream as one statement.
    pub fn parse_statement(mut self) -> ParseResult {
        let stmt = self.parse_stmt();
        let stmt = if self.errors.has_errors() { None } else { stmt };
        ParseResult {
            stmt,
            errors: self.errors,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Returns the previously consumed token's span.
    pub(crate) fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::point(0)
        }
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Returns `true` if the current token is `Eof`.
    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Check if the current token matches the given kind exactly.
    pub(crate) fn check_exact(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check_exact(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// All tokens of the statement, for whole-statement checks.
    pub(crate) fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Expect a specific token kind. Returns the token if matched, or emits an error.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Option<Token> {
        if self.check_exact(expected) {
            Some(self.advance())
        } else {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected '{}', got '{}'", expected, self.peek_kind()),
            );
            None
        }
    }

    /// Expect an identifier token. Returns the name and span.
    pub(crate) fn expect_identifier(&mut self) -> Option<Ident> {
        match self.peek_kind().clone() {
            TokenKind::Ident(name) => {
                let span = self.advance().span;
                Some(Ident::new(name, span))
            }
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected identifier, got '{}'", self.peek_kind()),
                );
                None
            }
        }
    }

    // ── Nesting ───────────────────────────────────────────────────────────────

    /// Enter one nesting level. Reports and returns `false` past the limit.
    pub(crate) fn enter_nested(&mut self) -> bool {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            self.error_at_current(
                ErrorCode::NESTING_LIMIT_EXCEEDED,
                format!("expression nesting deeper than {MAX_NESTING_DEPTH}"),
            );
            self.depth -= 1;
            return false;
        }
        true
    }

    pub(crate) fn leave_nested(&mut self) {
        self.depth -= 1;
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Report an error at the current token position.
    pub(crate) fn error_at_current(&mut self, code: ErrorCode, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(code, message, span);
    }

    /// Report an error at a specific span.
    pub(crate) fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        if self.errors.is_full() {
            return;
        }
        let error = ParseError::new(code, message, span, self.source);
        self.errors.push(error);
    }
}
