use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("fn", TokenKind::Fn);
        map.insert("give", TokenKind::Give);
        map.insert("if", TokenKind::If);
        map.insert("import", TokenKind::Import);
        map.insert("type", TokenKind::Type);
        map.insert("int", TokenKind::IntType);
        map.insert("float", TokenKind::FloatType);
        map.insert("double", TokenKind::DoubleType);
        map.insert("bool", TokenKind::BoolType);
        map.insert("string", TokenKind::StringType);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    NewLine,
    Identifier,

    Int,
    Float,
    Double,
    String,

    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Dot,
    Semicolon,
    Comma,
    Arrow,

    Plus,
    Dash,
    Slash,
    Star,

    // Reserved
    Fn,
    Give,
    If,
    Import,
    Type,
    True,
    False,
    IntType,
    FloatType,
    DoubleType,
    BoolType,
    StringType,
}

impl TokenKind {
    /// Keywords that name a built-in type in declarations and signatures.
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::IntType
                | TokenKind::FloatType
                | TokenKind::DoubleType
                | TokenKind::BoolType
                | TokenKind::StringType
        )
    }

    /// Tokens after which a simple statement may end.
    pub fn is_terminator(&self) -> bool {
        matches!(self, TokenKind::NewLine | TokenKind::Semicolon | TokenKind::EOF)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Identifier
            | TokenKind::Int
            | TokenKind::Float
            | TokenKind::Double
            | TokenKind::String => write!(f, "{} ({})", self.kind, self.value),
            _ => write!(f, "{}", self.kind),
        }
    }
}
