//! fsq parser: converts one statement's token stream into a [`Stmt`].
//!
//! [`Stmt`]: fsq_types::ast::Stmt

mod parse_expr;
mod parse_stmt;
mod parser;
mod split;

pub use parser::{ParseResult, Parser, MAX_NESTING_DEPTH};
pub use split::{split_statements, Segment};

use fsq_lexer::Lexer;

/// Lex and parse a single statement.
///
/// Lexical errors short-circuit parsing: a statement whose tokens are
/// already broken would only produce follow-on syntax errors.
pub fn parse_statement(source: &str) -> ParseResult {
    let lexed = Lexer::new(source).lex();
    if lexed.errors.has_errors() {
        return ParseResult {
            stmt: None,
            errors: lexed.errors,
        };
    }
    Parser::new(lexed.tokens, source).parse_statement()
}
