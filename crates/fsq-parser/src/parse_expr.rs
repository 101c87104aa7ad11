//! Expression parsing with operator precedence.
//!
//! Precedence (lowest → highest, all left-associative):
//! 1. `||`
//! 2. `&&`
//! 3. `==`, `!=`, `<`, `<=`, `>`, `>=`
//! 4. `+`, `-`, `|`, `^`
//! 5. `*`, `/`, `%`, `<<`, `>>`, `&`, `&^`
//!
//! Unary `+ - ! ^` bind tighter than any binary operator; selectors,
//! index/slice and calls bind tightest.

use fsq_lexer::TokenKind;
use fsq_types::ast::*;
use fsq_types::ErrorCode;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        if !self.enter_nested() {
            return None;
        }
        let result = self.parse_binary(1);
        self.leave_nested();
        result
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Binary Operators
    // ══════════════════════════════════════════════════════════════════════════

    /// `BinaryExpr = UnaryExpr { BinOp UnaryExpr }`, climbing from `min_prec`.
    ///
    /// Every operator and postfix step deepens the tree by one level and is
    /// counted against the nesting limit until the chain is complete.
    fn parse_binary(&mut self, min_prec: u8) -> Option<Expr> {
        let entered = self.depth;
        let result = self.parse_binary_chain(min_prec);
        self.depth = entered;
        result
    }

    fn parse_binary_chain(&mut self, min_prec: u8) -> Option<Expr> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.match_binary_op() {
            if op.precedence() < min_prec {
                break;
            }
            if !self.enter_nested() {
                return None;
            }
            self.advance(); // consume operator
            let right = self.parse_binary(op.precedence() + 1)?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    /// Check if the current token is a binary operator.
    fn match_binary_op(&self) -> Option<BinOp> {
        let op = match self.peek_kind() {
            TokenKind::OrOr => BinOp::LogicalOr,
            TokenKind::AndAnd => BinOp::LogicalAnd,
            TokenKind::EqEq => BinOp::Eq,
            TokenKind::BangEq => BinOp::NotEq,
            TokenKind::Less => BinOp::Less,
            TokenKind::LessEq => BinOp::LessEq,
            TokenKind::Greater => BinOp::Greater,
            TokenKind::GreaterEq => BinOp::GreaterEq,
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Pipe => BinOp::BitOr,
            TokenKind::Caret => BinOp::BitXor,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::Percent => BinOp::Rem,
            TokenKind::Shl => BinOp::Shl,
            TokenKind::Shr => BinOp::Shr,
            TokenKind::Amp => BinOp::BitAnd,
            TokenKind::AmpCaret => BinOp::AndNot,
            _ => return None,
        };
        Some(op)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Unary & Postfix
    // ══════════════════════════════════════════════════════════════════════════

    /// `UnaryExpr = ( "+" | "-" | "!" | "^" ) UnaryExpr | PostfixExpr`
    fn parse_unary(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let op = match self.peek_kind() {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Caret => UnaryOp::Complement,
            _ => return self.parse_postfix(),
        };
        self.advance();
        if !self.enter_nested() {
            return None;
        }
        let operand = self.parse_unary();
        self.leave_nested();
        let operand = operand?;
        let span = start.merge(operand.span);
        Some(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// `PostfixExpr = PrimaryExpr { "." Ident | "[" Index "]" | "(" Args ")" }`
    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if matches!(
                self.peek_kind(),
                TokenKind::Dot | TokenKind::LBracket | TokenKind::LParen
            ) && !self.enter_nested()
            {
                return None;
            }
            match self.peek_kind() {
                TokenKind::Dot => {
                    self.advance(); // eat `.`
                    let name = self.expect_identifier()?;
                    let span = expr.span.merge(name.span);
                    expr = Expr::new(
                        ExprKind::Selector {
                            base: Box::new(expr),
                            name,
                        },
                        span,
                    );
                }
                TokenKind::LBracket => {
                    self.advance(); // eat `[`
                    expr = self.parse_index_or_slice(expr)?;
                }
                TokenKind::LParen => {
                    self.advance(); // eat `(`
                    let args = self.parse_arg_list()?;
                    self.expect(&TokenKind::RParen)?;
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Call {
                            func: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                _ => break,
            }
        }
        Some(expr)
    }

    /// Parse the inside of `base[...]` after the `[`.
    ///
    /// `[i]` is an index; `[lo:hi]`, `[lo:]`, `[:hi]` and `[:]` are slices.
    fn parse_index_or_slice(&mut self, base: Expr) -> Option<Expr> {
        let low = if self.check_exact(&TokenKind::Colon) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        if !self.eat(&TokenKind::Colon) {
            self.expect(&TokenKind::RBracket)?;
            let span = base.span.merge(self.previous_span());
            let index = low?;
            return Some(Expr::new(
                ExprKind::Index {
                    base: Box::new(base),
                    index: Box::new(index),
                },
                span,
            ));
        }

        let high = if self.check_exact(&TokenKind::RBracket) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::RBracket)?;
        let span = base.span.merge(self.previous_span());
        Some(Expr::new(
            ExprKind::Slice {
                base: Box::new(base),
                low: low.map(Box::new),
                high: high.map(Box::new),
            },
            span,
        ))
    }

    /// Parse a comma-separated argument list (inside parens).
    fn parse_arg_list(&mut self) -> Option<Vec<Expr>> {
        let mut args = Vec::new();
        if self.check_exact(&TokenKind::RParen) {
            return Some(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            // Allow trailing comma before `)`
            if self.check_exact(&TokenKind::RParen) {
                break;
            }
        }
        Some(args)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary Expressions
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse a primary expression.
    fn parse_primary(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let literal = match self.peek_kind().clone() {
            // ── Literals ────────────────────────────────────────────────
            TokenKind::Int(text) => Literal::new(LitKind::Int, text),
            TokenKind::Float(text) => Literal::new(LitKind::Float, text),
            TokenKind::Imag(text) => Literal::new(LitKind::Imag, text),
            TokenKind::Rune(c) => Literal::new(LitKind::Rune, c.to_string()),
            TokenKind::Str(s) => Literal::new(LitKind::String, s),
            TokenKind::True => Literal::new(LitKind::Bool, "true"),
            TokenKind::False => Literal::new(LitKind::Bool, "false"),

            // ── Names ───────────────────────────────────────────────────
            TokenKind::Ident(name) => {
                self.advance();
                return Some(Expr::new(ExprKind::Identifier(name), start));
            }

            // ── Grouping ────────────────────────────────────────────────
            TokenKind::LParen => {
                self.advance(); // eat `(`
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                let span = start.merge(self.previous_span());
                return Some(Expr::new(ExprKind::Paren(Box::new(inner)), span));
            }

            TokenKind::Eof => {
                self.error_at_current(ErrorCode::EMPTY_EXPRESSION, "expected expression");
                return None;
            }
            other => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected expression, got '{other}'"),
                );
                return None;
            }
        };
        self.advance();
        Some(Expr::new(ExprKind::Literal(literal), start))
    }
}
