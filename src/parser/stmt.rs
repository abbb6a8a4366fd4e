use std::rc::Rc;

use crate::{
    ast::{
        ast::{Expr, Reference, Stmt},
        statements::{
            AssignmentStmt, DeclarationStmt, ExpressionStmt, FunctionStmt, GiveStmt, IfStmt,
            ImportStmt, Parameter, TypeDefinitionStmt,
        },
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    Span,
};

use super::{parser::Parser, types::parse_type_name};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()) {
        let handler = *handler;
        return handler(parser);
    }

    // `Point p` declares a variable of a user-defined type
    if parser.current_token_kind() == TokenKind::Identifier
        && parser.peek_kind(1) == TokenKind::Identifier
    {
        return parse_declaration_stmt(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;

    let stmt = if parser.current_token_kind() == TokenKind::Assignment {
        let start = expr.get_span().start.clone();
        let name = match expr {
            Expr::Variable(variable) if variable.child.is_none() => variable.name,
            _ => return Err(parser.unexpected_detailed("only plain names can be assigned to")),
        };
        parser.advance();
        let value = parse_expr(parser, BindingPower::Default)?;

        Stmt::Assignment(AssignmentStmt {
            span: Span {
                start,
                end: value.get_span().end.clone(),
            },
            name,
            value,
        })
    } else if ends_with_call(&expr) {
        Stmt::Expression(ExpressionStmt {
            span: expr.get_span().clone(),
            expression: expr,
        })
    } else {
        return Err(parser.unexpected_detailed("expected an assignment or a call"));
    };

    expect_terminator(parser)?;
    Ok(stmt)
}

fn reference_ends_with_call(reference: &Reference) -> bool {
    match reference {
        Reference::Variable(variable) => variable.child.as_deref().is_some_and(reference_ends_with_call),
        Reference::Call(call) => match call.child.as_deref() {
            Some(next) => reference_ends_with_call(next),
            None => true,
        },
    }
}

fn ends_with_call(expr: &Expr) -> bool {
    match expr {
        Expr::Call(call) => match call.child.as_deref() {
            Some(next) => reference_ends_with_call(next),
            None => true,
        },
        Expr::Variable(variable) => variable.child.as_deref().is_some_and(reference_ends_with_call),
        Expr::Literal(literal) => literal.child.as_deref().is_some_and(reference_ends_with_call),
        Expr::Binary(_) | Expr::Unary(_) => false,
    }
}

/// A simple statement ends at a newline, at the `;` closing its block, or at EOF.
pub fn expect_terminator(parser: &mut Parser) -> Result<(), Error> {
    match parser.current_token_kind() {
        TokenKind::NewLine => {
            parser.advance();
            Ok(())
        }
        TokenKind::Semicolon | TokenKind::EOF => Ok(()),
        _ => Err(parser.unexpected()),
    }
}

/// Parses statements up to and including the `;` closing a block.
pub fn parse_block(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    let mut statements = Vec::new();

    loop {
        parser.skip_newlines();
        match parser.current_token_kind() {
            TokenKind::Semicolon => {
                parser.advance();
                break;
            }
            TokenKind::EOF => {
                return Err(parser.unexpected_detailed("expected `;` to close the block"));
            }
            _ => statements.push(parse_stmt(parser)?),
        }
    }

    expect_terminator(parser)?;
    Ok(statements)
}

pub fn parse_declaration_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let type_name = parse_type_name(parser)?;

    let error = parser.unexpected_detailed("expected identifier during variable declaration");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let value = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    let end = match &value {
        Some(value) => value.get_span().end.clone(),
        None => parser.get_position(),
    };

    expect_terminator(parser)?;

    Ok(Stmt::Declaration(DeclarationStmt {
        span: Span {
            start: type_name.span.start.clone(),
            end,
        },
        type_name,
        name,
        value,
    }))
}

pub fn parse_import_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let mut hierarchy = vec![parser.expect(TokenKind::Identifier)?.value];
    while parser.current_token_kind() == TokenKind::Dot {
        parser.advance();
        hierarchy.push(parser.expect(TokenKind::Identifier)?.value);
    }

    let end = parser.get_position();
    expect_terminator(parser)?;

    Ok(Stmt::Import(ImportStmt {
        hierarchy,
        span: Span { start, end },
    }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_block(parser)?;

    Ok(Stmt::If(IfStmt {
        condition,
        body,
        span: Span {
            start,
            end: parser.get_position(),
        },
    }))
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let name = parser.expect(TokenKind::Identifier)?.value;

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        let type_name = parse_type_name(parser)?;
        let name_token = parser.expect(TokenKind::Identifier)?;
        parameters.push(Parameter {
            span: Span {
                start: type_name.span.start.clone(),
                end: name_token.span.end,
            },
            type_name,
            name: name_token.value,
        });

        match parser.current_token_kind() {
            TokenKind::Comma => {
                parser.advance();
            }
            TokenKind::CloseParen => {}
            _ => return Err(parser.unexpected_detailed("expected `,` or `)` in parameter list")),
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let give_type = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        Some(parse_type_name(parser)?)
    } else {
        None
    };

    let body = parse_block(parser)?;

    Ok(Stmt::Function(Rc::new(FunctionStmt {
        span: Span {
            start,
            end: parser.get_position(),
        },
        name,
        parameters,
        give_type,
        body,
    })))
}

pub fn parse_give_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance();

    let value = if parser.current_token_kind().is_terminator() {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };

    let end = match &value {
        Some(value) => value.get_span().end.clone(),
        None => token.span.end,
    };

    expect_terminator(parser)?;

    Ok(Stmt::Give(GiveStmt {
        value,
        span: Span {
            start: token.span.start,
            end,
        },
    }))
}

pub fn parse_type_definition_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let name = parser.expect(TokenKind::Identifier)?.value;
    let body = parse_block(parser)?;

    Ok(Stmt::TypeDefinition(Rc::new(TypeDefinitionStmt {
        name,
        body,
        span: Span {
            start,
            end: parser.get_position(),
        },
    })))
}
