//! Statement parsing: `target = value` or a bare expression.

use fsq_lexer::TokenKind;
use fsq_types::ast::Stmt;
use fsq_types::ErrorCode;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// `Stmt = Target "=" Expr | Expr`, followed by end of input.
    pub(crate) fn parse_stmt(&mut self) -> Option<Stmt> {
        if self.at_end() {
            self.error_at_current(ErrorCode::EMPTY_EXPRESSION, "empty statement");
            return None;
        }

        // `==`, `!=`, `<=` and `>=` are their own tokens, so every `Assign`
        // token here really is an assignment.
        let extra_assign = self
            .tokens()
            .iter()
            .filter(|t| t.kind == TokenKind::Assign)
            .nth(1)
            .map(|t| t.span);
        if let Some(span) = extra_assign {
            self.error_at(
                ErrorCode::MULTIPLE_ASSIGNMENT,
                "multiple assignment not supported",
                span,
            );
            return None;
        }

        let first = self.parse_expression()?;

        let stmt = if self.check_exact(&TokenKind::Assign) {
            let eq_span = self.advance().span;
            if !first.is_assignable() {
                self.error_at(
                    ErrorCode::INVALID_ASSIGN_TARGET,
                    "cannot assign to this expression",
                    first.span,
                );
                return None;
            }
            if self.at_end() {
                self.error_at(
                    ErrorCode::EMPTY_EXPRESSION,
                    "missing value after '='",
                    eq_span,
                );
                return None;
            }
            let value = self.parse_expression()?;
            let span = first.span.merge(value.span);
            Stmt::Assign {
                target: first,
                value,
                span,
            }
        } else {
            Stmt::Expr(first)
        };

        if !self.at_end() {
            self.error_at_current(
                ErrorCode::TRAILING_INPUT,
                format!("unexpected '{}' after expression", self.peek_kind()),
            );
            return None;
        }
        Some(stmt)
    }
}
