//! Unit tests for the lexer module.
//!
//! Covers keywords, identifiers, numeric and string literals, operators,
//! newlines, comments, and error cases.

use super::{lexer::tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source, Some("test.boink".to_string()))
        .unwrap()
        .iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    let tokens = tokenize("fn give if import type int float double bool string true false", Some("test.boink".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Fn);
    assert_eq!(tokens[1].kind, TokenKind::Give);
    assert_eq!(tokens[2].kind, TokenKind::If);
    assert_eq!(tokens[3].kind, TokenKind::Import);
    assert_eq!(tokens[4].kind, TokenKind::Type);
    assert_eq!(tokens[5].kind, TokenKind::IntType);
    assert_eq!(tokens[6].kind, TokenKind::FloatType);
    assert_eq!(tokens[7].kind, TokenKind::DoubleType);
    assert_eq!(tokens[8].kind, TokenKind::BoolType);
    assert_eq!(tokens[9].kind, TokenKind::StringType);
    assert_eq!(tokens[10].kind, TokenKind::True);
    assert_eq!(tokens[11].kind, TokenKind::False);
    assert_eq!(tokens[12].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("foo bar_1 _under CamelCase give_me", None).unwrap();

    let values: Vec<&str> = tokens.iter().take(5).map(|token| token.value.as_str()).collect();
    assert_eq!(values, vec!["foo", "bar_1", "_under", "CamelCase", "give_me"]);
    assert!(tokens.iter().take(5).all(|token| token.kind == TokenKind::Identifier));
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize("42 3.14 2.5f 0", None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Int);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Double);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Float);
    assert_eq!(tokens[2].value, "2.5");
    assert_eq!(tokens[3].kind, TokenKind::Int);
}

#[test]
fn test_tokenize_strings() {
    let tokens = tokenize(r#""hello" "two words" "line\nbreak" "quote \" inside""#, None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "two words");
    assert_eq!(tokens[2].value, "line\nbreak");
    assert_eq!(tokens[3].value, "quote \" inside");
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("+ - * / && || > >= < <= == = -> . , ; ( )"),
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Greater,
            TokenKind::GreaterEquals,
            TokenKind::Less,
            TokenKind::LessEquals,
            TokenKind::Equals,
            TokenKind::Assignment,
            TokenKind::Arrow,
            TokenKind::Dot,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_newlines_are_tokens() {
    assert_eq!(
        kinds("int a\r\na = 1\n"),
        vec![
            TokenKind::IntType,
            TokenKind::Identifier,
            TokenKind::NewLine,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Int,
            TokenKind::NewLine,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        kinds("a # trailing comment\n#> block\ncomment <# b"),
        vec![
            TokenKind::Identifier,
            TokenKind::NewLine,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_token_spans() {
    let tokens = tokenize("int  value", None).unwrap();

    assert_eq!(tokens[1].span.start.0, 5);
    assert_eq!(tokens[1].span.end.0, 10);
    assert_eq!(*tokens[1].span.start.1, "shell");
}

#[test]
fn test_unknown_character() {
    let error = tokenize("int a = 1 @ 2", None).unwrap_err();

    assert_eq!(error.get_error_name(), "UnknownToken");
    assert_eq!(error.get_position().0, 10);
}

#[test]
fn test_unterminated_string() {
    let error = tokenize("string s = \"open", None).unwrap_err();

    assert_eq!(error.get_error_name(), "UnknownToken");
}
