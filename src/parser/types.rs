use crate::{ast::types::TypeName, errors::errors::Error, lexer::tokens::TokenKind};

use super::parser::Parser;

/// Parses a type name: a built-in type keyword or a class identifier.
pub fn parse_type_name(parser: &mut Parser) -> Result<TypeName, Error> {
    let kind = parser.current_token_kind();
    if kind.is_type_keyword() || kind == TokenKind::Identifier {
        let token = parser.advance();
        Ok(TypeName {
            name: token.value,
            span: token.span,
        })
    } else {
        Err(parser.unexpected_detailed("expected a type name"))
    }
}
