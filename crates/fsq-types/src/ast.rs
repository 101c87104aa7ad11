//! AST node types for fsq statements.
//!
//! Every node carries a [`Span`] for error reporting. A tree is built per
//! statement, walked once by the evaluator and then dropped.

use crate::Span;
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// One `;`-separated statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `target = value`
    Assign {
        target: Expr,
        value: Expr,
        span: Span,
    },
    /// A bare expression whose value is printed.
    Expr(Expr),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Assign { span, .. } => *span,
            Stmt::Expr(expr) => expr.span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ══════════════════════════════════════════════════════════════════════════════

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Whether this node can appear on the left of `=`.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Identifier(_) | ExprKind::Selector { .. } | ExprKind::Index { .. }
        )
    }
}

/// Expression node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `fs`, `foo_bar`
    Identifier(String),
    /// `base.name`
    Selector { base: Box<Expr>, name: Ident },
    /// `base[index]`
    Index { base: Box<Expr>, index: Box<Expr> },
    /// `base[low:high]`, either bound optional
    Slice {
        base: Box<Expr>,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
    },
    /// `42`, `0x1f`, `2.5e3`, `"text"`, `'a'`, `true`
    Literal(Literal),
    /// `a + b`, `a << 2`, `a == b`, ...
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `-x`, `!ok`, `^mask`
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// `func(args...)`
    Call { func: Box<Expr>, args: Vec<Expr> },
    /// `(expr)`
    Paren(Box<Expr>),
}

// ── Literals ──────────────────────────────────────────────────────────────────

/// A literal as written: its kind and its text.
///
/// Numeric text is the digits as written (separators and prefixes intact);
/// string and rune text is already unescaped.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LitKind,
    pub text: String,
}

impl Literal {
    pub fn new(kind: LitKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    /// Imaginary literal (`2i`). Parsed, never evaluated.
    Imag,
    Rune,
    String,
    Bool,
}

impl fmt::Display for LitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LitKind::Int => "int",
            LitKind::Float => "float",
            LitKind::Imag => "imaginary",
            LitKind::Rune => "rune",
            LitKind::String => "string",
            LitKind::Bool => "bool",
        };
        f.write_str(s)
    }
}

// ── Binary Operators ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Logical
    LogicalOr,
    LogicalAnd,
    // Comparison
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    // Additive
    Add,
    Sub,
    BitOr,
    BitXor,
    // Multiplicative
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    BitAnd,
    AndNot,
}

impl BinOp {
    /// Binding power: higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::LogicalOr => 1,
            BinOp::LogicalAnd => 2,
            BinOp::Eq
            | BinOp::NotEq
            | BinOp::Less
            | BinOp::LessEq
            | BinOp::Greater
            | BinOp::GreaterEq => 3,
            BinOp::Add | BinOp::Sub | BinOp::BitOr | BinOp::BitXor => 4,
            BinOp::Mul
            | BinOp::Div
            | BinOp::Rem
            | BinOp::Shl
            | BinOp::Shr
            | BinOp::BitAnd
            | BinOp::AndNot => 5,
        }
    }

    pub fn is_comparison(self) -> bool {
        self.precedence() == 3
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::LogicalOr => "||",
            BinOp::LogicalAnd => "&&",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Less => "<",
            BinOp::LessEq => "<=",
            BinOp::Greater => ">",
            BinOp::GreaterEq => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::BitAnd => "&",
            BinOp::AndNot => "&^",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ── Unary Operators ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `+x`
    Plus,
    /// `-x`
    Neg,
    /// `!x`
    Not,
    /// `^x` (bitwise complement)
    Complement,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::Complement => "^",
        };
        f.write_str(s)
    }
}
