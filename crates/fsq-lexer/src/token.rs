//! Token types for the fsq lexer.
//!
//! Defines [`TokenKind`] covering every lexeme of the expression grammar and
//! [`Token`], which pairs a kind with a source [`Span`].

use fsq_types::Span;
use std::fmt;

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every token kind in the expression grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────

    /// Integer literal, text as written: `42`, `0x1F`, `1_000`
    Int(String),
    /// Float literal, text as written: `2.5`, `1e-3`, `.5`
    Float(String),
    /// Imaginary literal, text as written: `2i`
    Imag(String),
    /// Rune literal, unescaped: `'a'`
    Rune(char),
    /// String literal, unescaped: `"hello"` or `` `raw` ``
    Str(String),
    /// `true`
    True,
    /// `false`
    False,

    /// Identifier: `fs`, `foo_bar`, `_x`
    Ident(String),

    // ── Arithmetic ───────────────────────────────────────────

    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,

    // ── Bitwise ──────────────────────────────────────────────

    /// `&`
    Amp,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `&^`
    AmpCaret,
    /// `<<`
    Shl,
    /// `>>`
    Shr,

    // ── Logical & comparison ─────────────────────────────────

    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `!`
    Bang,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `<`
    Less,
    /// `<=`
    LessEq,
    /// `>`
    Greater,
    /// `>=`
    GreaterEq,

    // ── Punctuation ──────────────────────────────────────────

    /// `=` (assignment)
    Assign,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,

    /// End of input.
    Eof,
}

impl TokenKind {
    /// Look up a keyword. `true` and `false` are the only reserved words.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        match s {
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            _ => None,
        }
    }

    /// Returns `true` if this token is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::Imag(_)
                | TokenKind::Rune(_)
                | TokenKind::Str(_)
                | TokenKind::True
                | TokenKind::False
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(s) | TokenKind::Float(s) | TokenKind::Imag(s) => f.write_str(s),
            TokenKind::Rune(c) => write!(f, "{c:?}"),
            TokenKind::Str(s) => write!(f, "{s:?}"),
            TokenKind::True => f.write_str("true"),
            TokenKind::False => f.write_str("false"),
            TokenKind::Ident(s) => f.write_str(s),
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::Percent => f.write_str("%"),
            TokenKind::Amp => f.write_str("&"),
            TokenKind::Pipe => f.write_str("|"),
            TokenKind::Caret => f.write_str("^"),
            TokenKind::AmpCaret => f.write_str("&^"),
            TokenKind::Shl => f.write_str("<<"),
            TokenKind::Shr => f.write_str(">>"),
            TokenKind::AndAnd => f.write_str("&&"),
            TokenKind::OrOr => f.write_str("||"),
            TokenKind::Bang => f.write_str("!"),
            TokenKind::EqEq => f.write_str("=="),
            TokenKind::BangEq => f.write_str("!="),
            TokenKind::Less => f.write_str("<"),
            TokenKind::LessEq => f.write_str("<="),
            TokenKind::Greater => f.write_str(">"),
            TokenKind::GreaterEq => f.write_str(">="),
            TokenKind::Assign => f.write_str("="),
            TokenKind::Dot => f.write_str("."),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Colon => f.write_str(":"),
            TokenKind::Semicolon => f.write_str(";"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::LBracket => f.write_str("["),
            TokenKind::RBracket => f.write_str("]"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}
