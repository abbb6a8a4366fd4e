//! Unit tests for the parser module.
//!
//! Covers declarations, assignments, functions, `if`, `give`, imports,
//! type definitions, operator precedence, member chains and syntax errors.

use std::rc::Rc;

use crate::{
    ast::{
        ast::{Expr, Program, Reference, Stmt},
        expressions::LiteralValue,
    },
    errors::errors::{Error, ErrorImpl, ErrorKind},
    lexer::lexer::tokenize,
    types::operators::{BinaryOperator, UnaryOperator},
};

use super::parser::parse;

fn parse_source(source: &str) -> Result<Program, Error> {
    let tokens = tokenize(source, Some("test.boink".to_string()))?;
    parse(tokens, Rc::new("test.boink".to_string()))
}

fn statements(source: &str) -> Vec<Stmt> {
    parse_source(source).unwrap().statements
}

#[test]
fn test_parse_variable_declaration() {
    let stmts = statements("int x = 42");

    assert_eq!(stmts.len(), 1);
    match &stmts[0] {
        Stmt::Declaration(decl) => {
            assert_eq!(decl.type_name.name, "int");
            assert_eq!(decl.name, "x");
            match &decl.value {
                Some(Expr::Literal(literal)) => assert_eq!(literal.value, LiteralValue::Int(42)),
                other => panic!("expected literal initializer, got {:?}", other),
            }
        }
        other => panic!("expected declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_declaration_without_initializer() {
    let stmts = statements("string name\nbool flag");

    assert_eq!(stmts.len(), 2);
    assert!(matches!(&stmts[0], Stmt::Declaration(decl) if decl.value.is_none()));
    assert!(matches!(&stmts[1], Stmt::Declaration(decl) if decl.type_name.name == "bool"));
}

#[test]
fn test_parse_user_type_declaration() {
    let stmts = statements("Point p");

    match &stmts[0] {
        Stmt::Declaration(decl) => {
            assert_eq!(decl.type_name.name, "Point");
            assert!(decl.type_name.builtin().is_none());
            assert_eq!(decl.name, "p");
        }
        other => panic!("expected declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_assignment() {
    let stmts = statements("x = x + 1");

    match &stmts[0] {
        Stmt::Assignment(assignment) => {
            assert_eq!(assignment.name, "x");
            assert!(matches!(assignment.value, Expr::Binary(_)));
        }
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_parse_function_declaration() {
    let stmts = statements("fn add(int a, int b) -> int\n    give a + b\n;");

    match &stmts[0] {
        Stmt::Function(function) => {
            assert_eq!(function.name, "add");
            assert_eq!(function.parameters.len(), 2);
            assert_eq!(function.parameters[1].name, "b");
            assert_eq!(function.give_type.as_ref().map(|t| t.name.as_str()), Some("int"));
            assert_eq!(function.body.len(), 1);
            assert!(matches!(&function.body[0], Stmt::Give(give) if give.value.is_some()));
        }
        other => panic!("expected function, got {:?}", other),
    }
}

#[test]
fn test_parse_function_without_give_type() {
    let stmts = statements("fn hello()\n    give\n;\nhello()");

    assert_eq!(stmts.len(), 2);
    match &stmts[0] {
        Stmt::Function(function) => {
            assert!(function.parameters.is_empty());
            assert!(function.give_type.is_none());
            assert!(matches!(&function.body[0], Stmt::Give(give) if give.value.is_none()));
        }
        other => panic!("expected function, got {:?}", other),
    }
    assert!(matches!(&stmts[1], Stmt::Expression(_)));
}

#[test]
fn test_parse_if_statement() {
    let stmts = statements("if (x > 0)\n    x = 0\n;");

    match &stmts[0] {
        Stmt::If(if_stmt) => {
            assert!(matches!(&if_stmt.condition, Expr::Binary(binary) if binary.operator == BinaryOperator::Greater));
            assert_eq!(if_stmt.body.len(), 1);
        }
        other => panic!("expected if, got {:?}", other),
    }
}

#[test]
fn test_parse_nested_blocks() {
    let stmts = statements("fn f(int a) -> int\n    if (a > 1)\n        give 1\n    ;\n    give 0\n;");

    match &stmts[0] {
        Stmt::Function(function) => {
            assert_eq!(function.body.len(), 2);
            assert!(matches!(&function.body[0], Stmt::If(_)));
        }
        other => panic!("expected function, got {:?}", other),
    }
}

#[test]
fn test_parse_import() {
    let stmts = statements("import io\nimport shapes.circle");

    match (&stmts[0], &stmts[1]) {
        (Stmt::Import(first), Stmt::Import(second)) => {
            assert_eq!(first.hierarchy, vec!["io".to_string()]);
            assert_eq!(second.path(), "shapes.circle");
        }
        other => panic!("expected two imports, got {:?}", other),
    }
}

#[test]
fn test_parse_type_definition() {
    let stmts = statements("type Point\n    int x\n    int y\n    fn construct(int a)\n        x = a\n    ;\n;");

    match &stmts[0] {
        Stmt::TypeDefinition(definition) => {
            assert_eq!(definition.name, "Point");
            assert_eq!(definition.body.len(), 3);
            assert!(matches!(&definition.body[2], Stmt::Function(function) if function.name == "construct"));
        }
        other => panic!("expected type definition, got {:?}", other),
    }
}

#[test]
fn test_parse_precedence() {
    let stmts = statements("int x = 1 + 2 * 3");

    let Stmt::Declaration(decl) = &stmts[0] else {
        panic!("expected declaration");
    };
    match &decl.value {
        Some(Expr::Binary(binary)) => {
            assert_eq!(binary.operator, BinaryOperator::Add);
            assert!(matches!(&*binary.right, Expr::Binary(right) if right.operator == BinaryOperator::Multiply));
        }
        other => panic!("expected binary expression, got {:?}", other),
    }
}

#[test]
fn test_parse_grouping_and_unary() {
    let stmts = statements("int x = -(1 + 2)");

    let Stmt::Declaration(decl) = &stmts[0] else {
        panic!("expected declaration");
    };
    match &decl.value {
        Some(Expr::Unary(unary)) => {
            assert_eq!(unary.operator, UnaryOperator::Negative);
            assert!(matches!(&*unary.operand, Expr::Binary(_)));
        }
        other => panic!("expected unary expression, got {:?}", other),
    }
}

#[test]
fn test_parse_member_call_chain() {
    let stmts = statements("io.writeLine(a.toString())");

    let Stmt::Expression(stmt) = &stmts[0] else {
        panic!("expected expression statement");
    };
    let Expr::Variable(io) = &stmt.expression else {
        panic!("expected variable at the head of the chain");
    };
    assert_eq!(io.name, "io");
    match io.child.as_deref() {
        Some(Reference::Call(call)) => {
            assert_eq!(call.name, "writeLine");
            assert_eq!(call.arguments.len(), 1);
            assert!(call.child.is_none());
        }
        other => panic!("expected call segment, got {:?}", other),
    }
}

#[test]
fn test_parse_call_then_member() {
    let stmts = statements("string s = make().name");

    let Stmt::Declaration(decl) = &stmts[0] else {
        panic!("expected declaration");
    };
    match &decl.value {
        Some(Expr::Call(call)) => {
            assert_eq!(call.name, "make");
            assert!(matches!(call.child.as_deref(), Some(Reference::Variable(v)) if v.name == "name"));
        }
        other => panic!("expected call, got {:?}", other),
    }
}

#[test]
fn test_parse_literal_member() {
    let stmts = statements("string s = 5.toString()");

    let Stmt::Declaration(decl) = &stmts[0] else {
        panic!("expected declaration");
    };
    assert!(matches!(&decl.value, Some(Expr::Literal(literal)) if literal.child.is_some()));
}

#[test]
fn test_parse_expression_ids_are_unique() {
    let stmts = statements("int x = 1 + 2\nint y = x * 3");

    let mut ids = Vec::new();
    for stmt in &stmts {
        if let Stmt::Declaration(decl) = stmt {
            if let Some(Expr::Binary(binary)) = &decl.value {
                ids.push(binary.id);
                ids.push(binary.left.id());
                ids.push(binary.right.id());
            }
        }
    }
    let mut deduped = ids.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(ids.len(), 6);
    assert_eq!(deduped.len(), 6);
}

#[test]
fn test_parse_rejects_bare_expression() {
    let error = parse_source("1 + 2").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::UnexpectedToken);
}

#[test]
fn test_parse_rejects_unclosed_block() {
    let error = parse_source("fn f()\n    give\n").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::UnexpectedToken);
    assert!(error.message().contains("expected `;`"));
}

#[test]
fn test_parse_rejects_missing_declaration_name() {
    let error = parse_source("int = 5").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::UnexpectedToken);
}

#[test]
fn test_parse_rejects_two_statements_on_one_line() {
    assert!(parse_source("int a = 1 int b = 2").is_err());
}

#[test]
fn test_parse_int_overflow() {
    let error = parse_source("int a = 99999999999").unwrap_err();

    assert!(matches!(error.get_internal_error(), ErrorImpl::NumberParseError { .. }));
}
