use crate::{
    ast::{
        ast::{append_reference, Expr, Reference},
        expressions::{BinaryExpr, CallExpr, LiteralExpr, LiteralValue, UnaryExpr, VariableExpr},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    types::operators::{BinaryOperator, UnaryOperator},
    Position, Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected()),
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser.get_bp_lookup().get(&token_kind).unwrap_or(&BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(parser.unexpected()),
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

fn number_error(parser: &Parser) -> Error {
    Error::new(
        ErrorImpl::NumberParseError {
            token: parser.current_token().value.clone(),
        },
        parser.get_position(),
    )
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let value = match parser.current_token_kind() {
        TokenKind::Int => LiteralValue::Int(
            parser.current_token().value.parse().map_err(|_| number_error(parser))?,
        ),
        TokenKind::Float => LiteralValue::Float(
            parser.current_token().value.parse().map_err(|_| number_error(parser))?,
        ),
        TokenKind::Double => LiteralValue::Double(
            parser.current_token().value.parse().map_err(|_| number_error(parser))?,
        ),
        TokenKind::String => LiteralValue::String(parser.current_token().value.clone()),
        TokenKind::True => LiteralValue::Bool(true),
        TokenKind::False => LiteralValue::Bool(false),
        TokenKind::Identifier => {
            let token = parser.advance();
            return Ok(Expr::Variable(VariableExpr {
                id: parser.advance_id(),
                name: token.value,
                child: None,
                span: token.span,
            }));
        }
        _ => return Err(parser.unexpected()),
    };

    let span = parser.advance().span;
    Ok(Expr::Literal(LiteralExpr {
        id: parser.advance_id(),
        value,
        child: None,
        span,
    }))
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Dash => Some(BinaryOperator::Subtract),
        TokenKind::Star => Some(BinaryOperator::Multiply),
        TokenKind::Slash => Some(BinaryOperator::Divide),
        TokenKind::And => Some(BinaryOperator::And),
        TokenKind::Or => Some(BinaryOperator::Or),
        TokenKind::Greater => Some(BinaryOperator::Greater),
        TokenKind::GreaterEquals => Some(BinaryOperator::GreaterEquals),
        TokenKind::Less => Some(BinaryOperator::Less),
        TokenKind::LessEquals => Some(BinaryOperator::LessEquals),
        TokenKind::Equals => Some(BinaryOperator::EqualsEquals),
        _ => None,
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator = binary_operator(parser.current_token_kind()).ok_or_else(|| parser.unexpected())?;
    parser.advance();

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        id: parser.advance_id(),
        span: Span {
            start: left.get_span().start.clone(),
            end: right.get_span().end.clone(),
        },
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let operator = match operator_token.kind {
        TokenKind::Dash => UnaryOperator::Negative,
        _ => UnaryOperator::Positive,
    };
    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Unary(UnaryExpr {
        id: parser.advance_id(),
        span: Span {
            start: operator_token.span.start,
            end: operand.get_span().end.clone(),
        },
        operator,
        operand: Box::new(operand),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

fn into_call(reference: Reference, arguments: Vec<Expr>, end: &Position) -> Result<Reference, Vec<Expr>> {
    match reference {
        Reference::Variable(mut variable) => match variable.child.take() {
            None => Ok(Reference::Call(CallExpr {
                id: variable.id,
                name: variable.name,
                arguments,
                child: None,
                span: Span {
                    start: variable.span.start,
                    end: end.clone(),
                },
            })),
            Some(next) => {
                variable.child = Some(Box::new(into_call(*next, arguments, end)?));
                Ok(Reference::Variable(variable))
            }
        },
        Reference::Call(mut call) => match call.child.take() {
            None => Err(arguments),
            Some(next) => {
                call.child = Some(Box::new(into_call(*next, arguments, end)?));
                Ok(Reference::Call(call))
            }
        },
    }
}

/// Turns the last name of `callee` into a call with `arguments`.
fn make_call(callee: Expr, arguments: Vec<Expr>, end: &Position) -> Option<Expr> {
    match callee {
        Expr::Variable(variable) => {
            let reference = into_call(Reference::Variable(variable), arguments, end).ok()?;
            match reference {
                Reference::Call(call) => Some(Expr::Call(call)),
                Reference::Variable(variable) => Some(Expr::Variable(variable)),
            }
        }
        Expr::Call(mut call) => {
            let next = call.child.take()?;
            call.child = Some(Box::new(into_call(*next, arguments, end).ok()?));
            Some(Expr::Call(call))
        }
        Expr::Literal(mut literal) => {
            let next = literal.child.take()?;
            literal.child = Some(Box::new(into_call(*next, arguments, end).ok()?));
            Some(Expr::Literal(literal))
        }
        Expr::Binary(_) | Expr::Unary(_) => None,
    }
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let open = parser.advance();

    let mut arguments = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_expr(parser, BindingPower::Default)?);

        match parser.current_token_kind() {
            TokenKind::Comma => {
                parser.advance();
            }
            TokenKind::CloseParen => {}
            _ => return Err(parser.unexpected_detailed("expected `,` or `)` in argument list")),
        }
    }

    let end = parser.expect(TokenKind::CloseParen)?.span.end;

    make_call(left, arguments, &end).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: open.value,
                message: String::from("only named functions can be called"),
            },
            open.span.start,
        )
    })
}

pub fn parse_member_expr(parser: &mut Parser, mut left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let dot = parser.advance();

    let error = parser.unexpected_detailed("expected a member name after `.`");
    let member = parser.expect_error(TokenKind::Identifier, Some(error))?;

    let reference = Reference::Variable(VariableExpr {
        id: parser.advance_id(),
        name: member.value,
        child: None,
        span: member.span,
    });

    match left.child_slot() {
        Some(slot) => append_reference(slot, reference),
        None => {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: dot.value,
                    message: String::from("members can only be accessed on names, calls and literals"),
                },
                dot.span.start,
            ))
        }
    }

    Ok(left)
}
