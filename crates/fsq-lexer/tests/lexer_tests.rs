//! Lexer tests: operators, every literal form, error recovery and spans.

use fsq_lexer::{Lexer, TokenKind};
use fsq_types::{ErrorCode, Span};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex source text and return just the token kinds (excluding final Eof).
fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::new(source)
        .lex()
        .tokens
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.kind)
        .collect()
}

/// Lex and return the error count.
fn error_count(source: &str) -> usize {
    Lexer::new(source).lex().errors.total_errors
}

/// Lex and return the first error code.
fn first_code(source: &str) -> Option<ErrorCode> {
    Lexer::new(source).lex().errors.first().map(|e| e.code)
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Ident(name.to_string())
}

// ─────────────────────────────────────────────────────────────────────
// Identifiers & keywords
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_selector_chain() {
    assert_eq!(
        kinds("fs.time.year"),
        vec![
            ident("fs"),
            TokenKind::Dot,
            ident("time"),
            TokenKind::Dot,
            ident("year"),
        ]
    );
}

#[test]
fn test_underscore_identifiers() {
    assert_eq!(kinds("_x foo_bar"), vec![ident("_x"), ident("foo_bar")]);
}

#[test]
fn test_bool_keywords() {
    assert_eq!(
        kinds("true false truthy"),
        vec![TokenKind::True, TokenKind::False, ident("truthy")]
    );
}

#[test]
fn test_unicode_identifier() {
    assert_eq!(kinds("größe"), vec![ident("größe")]);
}

// ─────────────────────────────────────────────────────────────────────
// Operators
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_all_operators() {
    assert_eq!(
        kinds("+ - * / % & | ^ &^ << >> && || ! == != < <= > >= = . , : ; ( ) [ ]"),
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Amp,
            TokenKind::Pipe,
            TokenKind::Caret,
            TokenKind::AmpCaret,
            TokenKind::Shl,
            TokenKind::Shr,
            TokenKind::AndAnd,
            TokenKind::OrOr,
            TokenKind::Bang,
            TokenKind::EqEq,
            TokenKind::BangEq,
            TokenKind::Less,
            TokenKind::LessEq,
            TokenKind::Greater,
            TokenKind::GreaterEq,
            TokenKind::Assign,
            TokenKind::Dot,
            TokenKind::Comma,
            TokenKind::Colon,
            TokenKind::Semicolon,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBracket,
            TokenKind::RBracket,
        ]
    );
}

#[test]
fn test_operators_without_spaces() {
    assert_eq!(
        kinds("a==b"),
        vec![ident("a"), TokenKind::EqEq, ident("b")]
    );
    assert_eq!(
        kinds("x=1<<2"),
        vec![
            ident("x"),
            TokenKind::Assign,
            TokenKind::Int("1".into()),
            TokenKind::Shl,
            TokenKind::Int("2".into()),
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Number literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_integer_forms() {
    assert_eq!(
        kinds("42 0x1F 0o17 017 0b101 1_000"),
        vec![
            TokenKind::Int("42".into()),
            TokenKind::Int("0x1F".into()),
            TokenKind::Int("0o17".into()),
            TokenKind::Int("017".into()),
            TokenKind::Int("0b101".into()),
            TokenKind::Int("1_000".into()),
        ]
    );
}

#[test]
fn test_float_forms() {
    assert_eq!(
        kinds("2.5 .5 1. 1e3 6.02e+23 1E-9"),
        vec![
            TokenKind::Float("2.5".into()),
            TokenKind::Float(".5".into()),
            TokenKind::Float("1.".into()),
            TokenKind::Float("1e3".into()),
            TokenKind::Float("6.02e+23".into()),
            TokenKind::Float("1E-9".into()),
        ]
    );
}

#[test]
fn test_imaginary_literal() {
    assert_eq!(
        kinds("2i 1.5i"),
        vec![TokenKind::Imag("2i".into()), TokenKind::Imag("1.5i".into())]
    );
}

#[test]
fn test_index_after_number_is_not_a_float() {
    assert_eq!(
        kinds("a[1:2]"),
        vec![
            ident("a"),
            TokenKind::LBracket,
            TokenKind::Int("1".into()),
            TokenKind::Colon,
            TokenKind::Int("2".into()),
            TokenKind::RBracket,
        ]
    );
}

#[test]
fn test_malformed_numbers() {
    assert_eq!(first_code("12abc"), Some(ErrorCode::MALFORMED_NUMBER));
    assert_eq!(first_code("0x"), Some(ErrorCode::MALFORMED_NUMBER));
    assert_eq!(first_code("0x1g"), Some(ErrorCode::MALFORMED_NUMBER));
    assert_eq!(first_code("019"), Some(ErrorCode::MALFORMED_NUMBER));
    assert_eq!(first_code("1__0"), Some(ErrorCode::MALFORMED_NUMBER));
    assert_eq!(first_code("1e"), Some(ErrorCode::MALFORMED_NUMBER));
}

// ─────────────────────────────────────────────────────────────────────
// String & rune literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_string_escapes() {
    assert_eq!(
        kinds(r#""a\tb\n\"q\" \x41é\101""#),
        vec![TokenKind::Str("a\tb\n\"q\" AéA".into())]
    );
}

#[test]
fn test_raw_string_keeps_backslashes() {
    assert_eq!(kinds(r"`a\nb`"), vec![TokenKind::Str(r"a\nb".into())]);
}

#[test]
fn test_semicolon_inside_string_is_not_a_token() {
    assert_eq!(
        kinds(r#""a;b"; x"#),
        vec![TokenKind::Str("a;b".into()), TokenKind::Semicolon, ident("x")]
    );
}

#[test]
fn test_rune_literals() {
    assert_eq!(
        kinds(r"'a' '\n' '\'' 'é'"),
        vec![
            TokenKind::Rune('a'),
            TokenKind::Rune('\n'),
            TokenKind::Rune('\''),
            TokenKind::Rune('é'),
        ]
    );
}

#[test]
fn test_invalid_runes() {
    assert_eq!(first_code("'ab'"), Some(ErrorCode::INVALID_RUNE));
    assert_eq!(first_code("''"), Some(ErrorCode::INVALID_RUNE));
}

#[test]
fn test_unterminated_literals() {
    assert_eq!(first_code("\"abc"), Some(ErrorCode::UNTERMINATED_LITERAL));
    assert_eq!(first_code("`abc"), Some(ErrorCode::UNTERMINATED_LITERAL));
}

#[test]
fn test_invalid_escapes() {
    assert_eq!(first_code(r#""\q""#), Some(ErrorCode::INVALID_ESCAPE));
    assert_eq!(first_code(r#""\x4""#), Some(ErrorCode::INVALID_ESCAPE));
    assert_eq!(first_code(r#""\ud800""#), Some(ErrorCode::INVALID_ESCAPE));
}

// ─────────────────────────────────────────────────────────────────────
// Error recovery & spans
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_unexpected_character_recovers() {
    let result = Lexer::new("a $ b").lex();
    assert_eq!(result.errors.total_errors, 1);
    assert_eq!(
        result.errors.first().map(|e| e.code),
        Some(ErrorCode::UNEXPECTED_CHARACTER)
    );
    let kinds: Vec<_> = result.tokens.into_iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![ident("a"), ident("b"), TokenKind::Eof]);
}

#[test]
fn test_error_collection_is_capped() {
    let source = "$ ".repeat(20);
    let result = Lexer::new(&source).lex();
    assert!(result.errors.is_full());
    assert_eq!(result.tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
}

#[test]
fn test_long_run_of_bad_characters_stops_at_cap() {
    let source = "@".repeat(500_000);
    let result = Lexer::new(&source).lex();
    assert_eq!(result.errors.total_errors, fsq_types::MAX_ERRORS);
    assert_eq!(result.tokens.len(), 1);
    assert_eq!(result.tokens[0].kind, TokenKind::Eof);
}

#[test]
fn test_token_spans() {
    let tokens = Lexer::new("fs.ls(\"x\")").lex().tokens;
    let spans: Vec<Span> = tokens.iter().map(|t| t.span).collect();
    assert_eq!(
        spans,
        vec![
            Span::new(0, 2),
            Span::new(2, 3),
            Span::new(3, 5),
            Span::new(5, 6),
            Span::new(6, 9),
            Span::new(9, 10),
            Span::point(10),
        ]
    );
}

#[test]
fn test_empty_input() {
    assert!(kinds("").is_empty());
    assert!(kinds("   \t ").is_empty());
    assert_eq!(error_count(""), 0);
}
