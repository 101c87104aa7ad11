//! Core fsq lexer: converts one line of input into a token stream.
//!
//! Features:
//! - Go-flavoured literals: decimal/hex/octal/binary integers with `_`
//!   separators, decimal floats with exponents, imaginary suffix, rune
//!   literals, interpreted (`"..."`) and raw (`` `...` ``) strings
//! - Every operator of the expression grammar, including `&^`, `<<`, `>>`
//! - `;` is a token, so statement splitting never cuts through a literal
//! - Error recovery: collects up to [`fsq_types::MAX_ERRORS`] errors
//!   instead of stopping at the first

use fsq_types::{ErrorCode, ParseError, ParseErrors, Span};

use crate::token::{Token, TokenKind};

/// The fsq lexer.
pub struct Lexer<'src> {
    /// The full source text.
    source: &'src str,
    /// Current byte offset into `source`.
    pos: usize,
    /// Collected errors.
    errors: ParseErrors,
}

/// Result of lexing: tokens + any errors collected.
pub struct LexResult {
    /// The token stream (always ends with [`TokenKind::Eof`]).
    pub tokens: Vec<Token>,
    /// Errors encountered during lexing.
    pub errors: ParseErrors,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            errors: ParseErrors::empty(),
        }
    }

    /// Lex the entire input into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();

        loop {
            if self.errors.is_full() {
                break;
            }
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            tokens.push(Token::new(TokenKind::Eof, Span::point(self.pos)));
        }

        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.pos)
    }

    fn emit_error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let err = ParseError::new(code, message, span, self.source);
        self.errors.push(err);
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Token scanning
    // ─────────────────────────────────────────────────────────────

    fn scan_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            let start = self.pos;
            let Some(ch) = self.advance() else {
                return Token::new(TokenKind::Eof, Span::point(self.pos));
            };

            let kind = match ch {
                '"' => self.scan_string(start),
                '`' => self.scan_raw_string(start),
                '\'' => self.scan_rune(start),
                '0'..='9' => self.scan_number(start),
                '.' if matches!(self.peek(), Some('0'..='9')) => self.scan_number(start),
                c if c.is_alphabetic() || c == '_' => self.scan_identifier(start),

                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Star,
                '/' => TokenKind::Slash,
                '%' => TokenKind::Percent,
                '^' => TokenKind::Caret,
                '&' => {
                    if self.eat('&') {
                        TokenKind::AndAnd
                    } else if self.eat('^') {
                        TokenKind::AmpCaret
                    } else {
                        TokenKind::Amp
                    }
                }
                '|' => {
                    if self.eat('|') {
                        TokenKind::OrOr
                    } else {
                        TokenKind::Pipe
                    }
                }
                '!' => {
                    if self.eat('=') {
                        TokenKind::BangEq
                    } else {
                        TokenKind::Bang
                    }
                }
                '=' => {
                    if self.eat('=') {
                        TokenKind::EqEq
                    } else {
                        TokenKind::Assign
                    }
                }
                '<' => {
                    if self.eat('<') {
                        TokenKind::Shl
                    } else if self.eat('=') {
                        TokenKind::LessEq
                    } else {
                        TokenKind::Less
                    }
                }
                '>' => {
                    if self.eat('>') {
                        TokenKind::Shr
                    } else if self.eat('=') {
                        TokenKind::GreaterEq
                    } else {
                        TokenKind::Greater
                    }
                }
                '.' => TokenKind::Dot,
                ',' => TokenKind::Comma,
                ':' => TokenKind::Colon,
                ';' => TokenKind::Semicolon,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,

                other => {
                    let span = self.span_from(start);
                    self.emit_error(
                        ErrorCode::UNEXPECTED_CHARACTER,
                        format!("unexpected character '{other}'"),
                        span,
                    );
                    // Skip the character; give up once the error cap is hit.
                    if self.errors.is_full() {
                        return Token::new(TokenKind::Eof, Span::point(self.pos));
                    }
                    continue;
                }
            };

            return Token::new(kind, self.span_from(start));
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Identifiers & keywords
    // ─────────────────────────────────────────────────────────────

    fn scan_identifier(&mut self, start: usize) -> TokenKind {
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        let text = &self.source[start..self.pos];
        TokenKind::from_keyword(text).unwrap_or_else(|| TokenKind::Ident(text.to_string()))
    }

    // ─────────────────────────────────────────────────────────────
    // Number literals
    // ─────────────────────────────────────────────────────────────

    /// Scan a number. The first character (a digit or `.`) is consumed.
    fn scan_number(&mut self, start: usize) -> TokenKind {
        let first = self.source[start..].chars().next().unwrap_or('0');

        if first == '0' {
            let radix = match self.peek() {
                Some('x' | 'X') => Some(16),
                Some('o' | 'O') => Some(8),
                Some('b' | 'B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.advance();
                return self.scan_prefixed_int(start, radix);
            }
        }

        let mut is_float = first == '.';
        self.skip_digits(10);

        if !is_float && self.peek() == Some('.') {
            // `1.` is a float, `1..` never appears in this grammar
            self.advance();
            is_float = true;
            self.skip_digits(10);
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let has_exponent_digits = match self.peek_at(1) {
                Some('0'..='9') => true,
                Some('+' | '-') => matches!(self.peek_at(2), Some('0'..='9')),
                _ => false,
            };
            if has_exponent_digits {
                self.advance();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.advance();
                }
                self.skip_digits(10);
                is_float = true;
            } else {
                self.advance();
                let span = self.span_from(start);
                self.emit_error(ErrorCode::MALFORMED_NUMBER, "exponent has no digits", span);
            }
        }

        let is_imag = self.eat('i');
        self.reject_trailing_identifier(start);

        let text = self.source[start..self.pos].to_string();
        if text.ends_with('_') || text.contains("__") {
            let span = self.span_from(start);
            self.emit_error(
                ErrorCode::MALFORMED_NUMBER,
                "'_' must separate successive digits",
                span,
            );
        }

        if is_imag {
            TokenKind::Imag(text)
        } else if is_float {
            TokenKind::Float(text)
        } else {
            self.check_legacy_octal(start, &text);
            TokenKind::Int(text)
        }
    }

    fn scan_prefixed_int(&mut self, start: usize, radix: u32) -> TokenKind {
        let digits_start = self.pos;
        self.skip_digits(radix);
        let digits = &self.source[digits_start..self.pos];
        if digits.trim_matches('_').is_empty() {
            let span = self.span_from(start);
            self.emit_error(
                ErrorCode::MALFORMED_NUMBER,
                format!("base-{radix} literal has no digits"),
                span,
            );
        }
        self.reject_trailing_identifier(start);
        TokenKind::Int(self.source[start..self.pos].to_string())
    }

    fn skip_digits(&mut self, radix: u32) {
        while let Some(ch) = self.peek() {
            if ch.is_digit(radix) || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// `12abc` and `0x1g` are malformed numbers, not a number and a name.
    fn reject_trailing_identifier(&mut self, start: usize) {
        if matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
                self.advance();
            }
            let span = self.span_from(start);
            let text = span.text(self.source).to_string();
            self.emit_error(
                ErrorCode::MALFORMED_NUMBER,
                format!("malformed number literal '{text}'"),
                span,
            );
        }
    }

    /// `017` is octal; `019` is an error.
    fn check_legacy_octal(&mut self, start: usize, text: &str) {
        if text.len() > 1 && text.starts_with('0') && text.chars().any(|c| c == '8' || c == '9')
        {
            let span = self.span_from(start);
            self.emit_error(
                ErrorCode::MALFORMED_NUMBER,
                format!("invalid digit in octal literal '{text}'"),
                span,
            );
        }
    }

    // ─────────────────────────────────────────────────────────────
    // String & rune literals
    // ─────────────────────────────────────────────────────────────

    /// Scan an interpreted string literal after the opening `"`.
    fn scan_string(&mut self, start: usize) -> TokenKind {
        let mut buf = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    let span = self.span_from(start);
                    self.emit_error(
                        ErrorCode::UNTERMINATED_LITERAL,
                        "unterminated string literal",
                        span,
                    );
                    return TokenKind::Str(buf);
                }
                Some('"') => {
                    self.advance();
                    return TokenKind::Str(buf);
                }
                Some('\\') => {
                    if let Some(escaped) = self.scan_escape_sequence('"') {
                        buf.push(escaped);
                    }
                }
                Some(ch) => {
                    self.advance();
                    buf.push(ch);
                }
            }
        }
    }

    /// Scan a raw string literal after the opening backquote. No escapes.
    fn scan_raw_string(&mut self, start: usize) -> TokenKind {
        let body_start = self.pos;
        loop {
            match self.advance() {
                None => {
                    let span = self.span_from(start);
                    self.emit_error(
                        ErrorCode::UNTERMINATED_LITERAL,
                        "unterminated raw string literal",
                        span,
                    );
                    return TokenKind::Str(self.source[body_start..].replace('\r', ""));
                }
                Some('`') => {
                    let body = &self.source[body_start..self.pos - 1];
                    return TokenKind::Str(body.replace('\r', ""));
                }
                Some(_) => {}
            }
        }
    }

    /// Scan a rune literal after the opening `'`.
    fn scan_rune(&mut self, start: usize) -> TokenKind {
        let mut chars = Vec::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    let span = self.span_from(start);
                    self.emit_error(
                        ErrorCode::UNTERMINATED_LITERAL,
                        "unterminated rune literal",
                        span,
                    );
                    break;
                }
                Some('\'') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    if let Some(escaped) = self.scan_escape_sequence('\'') {
                        chars.push(escaped);
                    }
                }
                Some(ch) => {
                    self.advance();
                    chars.push(ch);
                }
            }
        }
        if chars.len() != 1 {
            let span = self.span_from(start);
            self.emit_error(
                ErrorCode::INVALID_RUNE,
                "rune literal must contain exactly one character",
                span,
            );
        }
        TokenKind::Rune(chars.first().copied().unwrap_or('\0'))
    }

    /// Scan an escape sequence starting at the `\`.
    /// Returns the unescaped character, or `None` if invalid (error emitted).
    fn scan_escape_sequence(&mut self, quote: char) -> Option<char> {
        let start = self.pos;
        self.advance(); // consume the '\'

        let ch = match self.advance() {
            Some(c) => c,
            None => {
                let span = self.span_from(start);
                self.emit_error(
                    ErrorCode::UNTERMINATED_LITERAL,
                    "unexpected end of input in escape sequence",
                    span,
                );
                return None;
            }
        };

        match ch {
            'a' => Some('\u{07}'),
            'b' => Some('\u{08}'),
            'f' => Some('\u{0C}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\u{0B}'),
            '\\' => Some('\\'),
            c if c == quote => Some(c),
            'x' => self.scan_code_point(start, 16, 2),
            'u' => self.scan_code_point(start, 16, 4),
            'U' => self.scan_code_point(start, 16, 8),
            '0'..='7' => {
                // Octal escapes are exactly three digits; one is consumed already.
                self.pos -= 1;
                self.scan_code_point(start, 8, 3)
            }
            other => {
                let span = self.span_from(start);
                self.emit_error(
                    ErrorCode::INVALID_ESCAPE,
                    format!("unknown escape sequence '\\{other}'"),
                    span,
                );
                Some(other)
            }
        }
    }

    fn scan_code_point(&mut self, start: usize, radix: u32, width: usize) -> Option<char> {
        let digits_start = self.pos;
        for _ in 0..width {
            match self.peek() {
                Some(c) if c.is_digit(radix) => {
                    self.advance();
                }
                _ => break,
            }
        }
        let digits = &self.source[digits_start..self.pos];
        let value = if digits.len() == width {
            u32::from_str_radix(digits, radix).ok()
        } else {
            None
        };
        match value.and_then(char::from_u32) {
            Some(c) => Some(c),
            None => {
                let span = self.span_from(start);
                let text = span.text(self.source).to_string();
                self.emit_error(
                    ErrorCode::INVALID_ESCAPE,
                    format!("invalid escape sequence '{text}'"),
                    span,
                );
                None
            }
        }
    }
}
